//! Static vocabulary tables backing the heuristic scorers.
//!
//! Matching is deliberately simple substring containment over lower-cased
//! text, not tokenized NLP. Every term here is lower-case for that reason.

/// Domain skill/tool/process terms probed against job descriptions.
pub const COMMON_KEYWORDS: &[&str] = &[
    // Languages
    "javascript",
    "typescript",
    "python",
    "java",
    "rust",
    "golang",
    "c++",
    "c#",
    "ruby",
    "php",
    "kotlin",
    "swift",
    "sql",
    // Frontend
    "react",
    "angular",
    "vue",
    "next.js",
    "html",
    "css",
    "sass",
    "tailwind",
    // Backend & data
    "node.js",
    "django",
    "flask",
    "spring",
    "rails",
    ".net",
    "graphql",
    "rest api",
    "grpc",
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "elasticsearch",
    "kafka",
    "rabbitmq",
    // Infrastructure
    "docker",
    "kubernetes",
    "terraform",
    "ansible",
    "aws",
    "azure",
    "gcp",
    "linux",
    "ci/cd",
    "devops",
    "microservices",
    "serverless",
    // Practices & tooling
    "git",
    "agile",
    "scrum",
    "kanban",
    "tdd",
    "unit testing",
    "code review",
    "debugging",
    "oauth",
    "security",
    // Data & ML
    "machine learning",
    "deep learning",
    "data analysis",
    "data visualization",
    "etl",
    "pandas",
    "tensorflow",
    "pytorch",
    // Soft / process
    "leadership",
    "communication",
    "mentoring",
    "project management",
    "stakeholder management",
    "problem solving",
    "cross-functional",
];

/// Bullet openers that read as passive to recruiters and ATS heuristics.
pub const WEAK_PHRASES: &[&str] = &["responsible for", "worked on", "helped with"];
