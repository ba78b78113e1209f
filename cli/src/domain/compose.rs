//! Compose project discovery: remote command shapes and the `env_file`
//! scanner used to enumerate a project's files.

use dockhand_common::COMPOSE_WORKING_DIR_LABEL;

use crate::domain::validate::shell_quote;

/// Compose document names, probed in this order. The first hit wins.
pub const COMPOSE_FILE_NAMES: [&str; 4] = [
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
];

/// Dotenv files probed at the project root.
pub const ROOT_ENV_FILES: [&str; 3] = [".env", ".env.local", ".env.production"];

/// Id of any one container carrying the compose project label.
#[must_use]
pub fn project_container_command(project: &str) -> String {
    format!(
        "docker ps -a --filter {} --format '{{{{.ID}}}}' | head -1",
        shell_quote(&format!("label=com.docker.compose.project={project}"))
    )
}

/// Working directory the compose tool recorded on the container.
#[must_use]
pub fn working_dir_command(container_id: &str) -> String {
    format!(
        "docker inspect {container_id} --format '{{{{index .Config.Labels \"{COMPOSE_WORKING_DIR_LABEL}\"}}}}'"
    )
}

/// Exits 0 iff `path` is a regular file.
#[must_use]
pub fn probe_file_command(path: &str) -> String {
    format!("test -f {}", shell_quote(path))
}

#[must_use]
pub fn read_file_command(path: &str) -> String {
    format!("cat {}", shell_quote(path))
}

/// Heredoc marker derived from `stamp` that does not occur as a line of
/// `content`.
#[must_use]
pub fn heredoc_delimiter(content: &str, stamp: i64) -> String {
    let base = format!("EOF_{stamp}");
    let collides = |delim: &str| content.lines().any(|line| line == delim);
    if !collides(&base) {
        return base;
    }
    (1u32..)
        .map(|n| format!("{base}_{n}"))
        .find(|delim| !collides(delim))
        .unwrap_or(base)
}

/// Replace the file at `path` with `content` using a quoted heredoc, so the
/// remote shell performs no expansion on the body.
#[must_use]
pub fn write_file_command(path: &str, content: &str, stamp: i64) -> String {
    let delim = heredoc_delimiter(content, stamp);
    let body = content.strip_suffix('\n').unwrap_or(content);
    format!("cat > {} << '{delim}'\n{body}\n{delim}", shell_quote(path))
}

/// Join `reference` onto `dir` unless it is absolute, then collapse `.`,
/// `..` and repeated separators.
#[must_use]
pub fn resolve_ref(dir: &str, reference: &str) -> String {
    let joined = if reference.starts_with('/') {
        reference.to_string()
    } else {
        format!("{dir}/{reference}")
    };
    let mut parts: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Every path named by an `env_file:` key, in document order.
///
/// Handles the scalar form, the flow list `[a, b]`, block lists, and the
/// long syntax (`- path: ./x.env`). Comments and surrounding quotes are
/// stripped. This is a line scanner, not a YAML parser.
#[must_use]
pub fn scan_env_file_refs(compose: &str) -> Vec<String> {
    let lines: Vec<&str> = compose.lines().collect();
    let mut refs = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        i += 1;
        let trimmed = line.trim_start();
        let Some(rest) = trimmed.strip_prefix("env_file:") else {
            continue;
        };
        let key_indent = line.len() - trimmed.len();
        let rest = strip_comment(rest).trim();

        if let Some(flow) = rest.strip_prefix('[') {
            let flow = flow.strip_suffix(']').unwrap_or(flow);
            refs.extend(flow.split(',').filter_map(clean_value));
            continue;
        }
        if !rest.is_empty() {
            refs.extend(clean_value(rest));
            continue;
        }

        while i < lines.len() {
            let item_line = lines[i];
            let item = strip_comment(item_line).trim();
            if item.is_empty() {
                i += 1;
                continue;
            }
            let indent = item_line.len() - item_line.trim_start().len();
            if let Some(entry) = item.strip_prefix('-').filter(|_| indent >= key_indent) {
                let entry = entry.trim();
                let entry = entry.strip_prefix("path:").unwrap_or(entry);
                refs.extend(clean_value(entry));
            } else if indent > key_indent {
                if let Some(path) = item.strip_prefix("path:") {
                    refs.extend(clean_value(path));
                }
            } else {
                break;
            }
            i += 1;
        }
    }
    refs
}

fn strip_comment(text: &str) -> &str {
    if text.trim_start().starts_with('#') {
        return "";
    }
    match text.find(" #") {
        Some(pos) => &text[..pos],
        None => text,
    }
}

fn clean_value(raw: &str) -> Option<String> {
    let value = raw.trim();
    let value = ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q).and_then(|v| v.strip_suffix(q)))
        .unwrap_or(value)
        .trim();
    (!value.is_empty()).then(|| value.to_string())
}
