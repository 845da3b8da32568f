// src/schedule.rs

use crate::model::FileSet;
use std::path::PathBuf;

/// Placeholder replaced by the rotation index in [`ROTATING_TEMPLATES`]
const INDEX_PLACEHOLDER: &str = "{n}";

/// A single-file commit: path, content, message
#[derive(Debug, Clone, Copy)]
pub struct FileTemplate {
    pub path: &'static str,
    pub content: &'static str,
    pub message: &'static str,
}

const fn file(path: &'static str, content: &'static str, message: &'static str) -> FileTemplate {
    FileTemplate { path, content, message }
}

/// A themed batch emitted once, in order, before the rotation starts
#[derive(Debug)]
pub struct Phase {
    pub name: &'static str,
    pub files: &'static [FileTemplate],
}

pub const PHASES: &[Phase] = &[
    Phase {
        name: "introduction",
        files: &[file(
            "README.md",
            "# DevOps Learning Journey 2021\n\nLearning DevOps throughout 2021",
            "Initial commit - Start DevOps learning journey",
        )],
    },
    Phase {
        name: "linux and bash",
        files: &[
            file("scripts/disk_check.sh", "#!/bin/bash\ndf -h\n", "Add disk space check script"),
            file("scripts/backup.sh", "#!/bin/bash\ntar -czf backup.tar.gz /data\n", "Add backup script"),
            file("scripts/monitor.sh", "#!/bin/bash\ntop -bn1 | head -20\n", "Add monitoring script"),
            file(".gitignore", "*.log\n*.swp\n.DS_Store\n", "Add gitignore"),
        ],
    },
    Phase {
        name: "docker",
        files: &[
            file(
                "docker/Dockerfile",
                "FROM nginx:alpine\nCOPY index.html /usr/share/nginx/html/\n",
                "Add nginx Dockerfile",
            ),
            file("docker/index.html", "<h1>DevOps 2021</h1>\n", "Add HTML file"),
            file(
                "docker-compose.yml",
                "version: \"3\"\nservices:\n  web:\n    build: .\n    ports:\n      - \"80:80\"\n",
                "Add docker-compose",
            ),
        ],
    },
    Phase {
        name: "kubernetes",
        files: &[
            file(
                "kubernetes/deployment.yaml",
                "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: app\n",
                "Add K8s deployment",
            ),
            file(
                "kubernetes/service.yaml",
                "apiVersion: v1\nkind: Service\nmetadata:\n  name: app-service\n",
                "Add K8s service",
            ),
            file("terraform/main.tf", "provider \"aws\" {\n  region = \"us-east-1\"\n}\n", "Add Terraform config"),
        ],
    },
    Phase {
        name: "ci/cd",
        files: &[
            file(
                ".github/workflows/ci.yml",
                "name: CI\non: [push]\njobs:\n  test:\n    runs-on: ubuntu-latest\n",
                "Add GitHub Actions",
            ),
            file(
                "ansible/playbook.yml",
                "---\n- hosts: all\n  tasks:\n    - name: Install Docker\n",
                "Add Ansible playbook",
            ),
            file("monitoring/prometheus.yml", "global:\n  scrape_interval: 15s\n", "Add Prometheus config"),
        ],
    },
];

/// Cycled forever once every phase has been emitted
pub const ROTATING_TEMPLATES: &[FileTemplate] = &[
    file("scripts/util_{n}.sh", "#!/bin/bash\necho \"Script {n}\"\n", "Add utility script {n}"),
    file("docker/app_{n}/Dockerfile", "FROM alpine\nLABEL app=\"app-{n}\"\nRUN apk add curl\n", "Add Dockerfile for app {n}"),
    file("kubernetes/config_{n}.yaml", "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: config-{n}\n", "Add ConfigMap {n}"),
    file("docs/guide_{n}.md", "# Guide {n}\n\nDocumentation\n", "Add documentation {n}"),
    file(
        "terraform/resource_{n}.tf",
        "resource \"aws_instance\" \"server_{n}\" {}\n",
        "Add Terraform resource {n}",
    ),
    file("scripts/deploy_{n}.sh", "#!/bin/bash\necho \"Deploying {n}\"\n", "Add deployment script {n}"),
    file("monitoring/alert_{n}.yml", "alert: High CPU {n}\n", "Add alert rule {n}"),
];

/// What to commit next, minus the timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    pub message: String,
    pub files: FileSet,
}

impl FileTemplate {
    /// Substitutes `index` for every `{n}` in path, content and message.
    pub fn render(&self, index: usize) -> CommitPlan {
        let index = index.to_string();
        let fill = |s: &str| s.replace(INDEX_PLACEHOLDER, &index);

        let mut files = FileSet::new();
        files.insert(PathBuf::from(fill(self.path)), fill(self.content));
        CommitPlan { message: fill(self.message), files }
    }
}

/// Infinite sequence of commit plans: the fixed phases first, then the
/// rotating templates with an index that grows by one per commit.
#[derive(Debug, Default)]
pub struct Schedule {
    phase: usize,
    file: usize,
    rotation: usize,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commits the fixed phases contribute before rotation begins.
    pub fn phase_len() -> usize {
        PHASES.iter().map(|p| p.files.len()).sum()
    }
}

impl Iterator for Schedule {
    type Item = CommitPlan;

    fn next(&mut self) -> Option<CommitPlan> {
        while let Some(phase) = PHASES.get(self.phase) {
            if let Some(template) = phase.files.get(self.file) {
                self.file += 1;
                tracing::trace!(phase = phase.name, path = template.path, "phase entry");
                return Some(template.render(0));
            }
            self.phase += 1;
            self.file = 0;
        }

        let template = &ROTATING_TEMPLATES[self.rotation % ROTATING_TEMPLATES.len()];
        let plan = template.render(self.rotation);
        self.rotation += 1;
        Some(plan)
    }
}
