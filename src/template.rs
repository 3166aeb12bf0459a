//! YAML template loading and `{{ env.KEY }}` substitution.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::utils::ConfigError;

/// Matches `{{ env.KEY }}`, `{{ env["KEY"] }}` and `{{ env['KEY'] }}`, each
/// with an optional `| default("...")` or `| default('...')` tail.
static ENV_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"\{\{\s*env(?:\.([A-Za-z_][A-Za-z0-9_]*)|\[\s*"([^"]*)"\s*\]|\[\s*'([^']*)'\s*\])"#,
        r#"(?:\s*\|\s*default\(\s*(?:"([^"]*)"|'([^']*)')\s*\))?\s*\}\}"#,
    ))
    .expect("valid regex")
});

/// Substitute `env` placeholders in `template`.
///
/// Keys missing from `env`, or every key when `env` is `None`, render as their
/// `default(...)` value, or an empty string without one. Other `{{ ... }}`
/// expressions are left untouched.
pub fn render_template(template: &str, env: Option<&HashMap<String, String>>) -> String {
    ENV_PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let key = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            let fallback = caps.get(4).or_else(|| caps.get(5)).map_or("", |m| m.as_str());
            env.and_then(|env| env.get(key))
                .map_or_else(|| fallback.to_string(), String::clone)
        })
        .into_owned()
}

/// Load a YAML template, render it with `env`, and parse the result.
///
/// Returns `Ok(None)` when no path is given.
pub fn load_and_render_yaml_template(
    template_path: Option<&Path>,
    env: Option<&HashMap<String, String>>,
) -> Result<Option<Value>, ConfigError> {
    let template_path = match template_path {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => return Ok(None),
    };

    if !template_path.exists() {
        return Err(ConfigError::TemplateNotFound {
            path: template_path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(template_path).map_err(|source| ConfigError::Io {
        path: template_path.to_path_buf(),
        source,
    })?;

    // The merged context is assembled but substitution only sees `env`.
    let mut render_env: HashMap<String, String> = std::env::vars().collect();
    if let Some(env) = env {
        render_env.extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    tracing::trace!(
        template = %template_path.display(),
        context_size = render_env.len(),
        "rendering yaml template"
    );

    let rendered = render_template(&content, env);
    let parsed = serde_yaml::from_str(&rendered).map_err(|source| ConfigError::Parse {
        path: template_path.to_path_buf(),
        source,
    })?;
    Ok(Some(parsed))
}

/// Build a shell command checking the installed Ray wheel commit.
///
/// Without a commit the command only reports what is installed; with one it
/// fails unless the installed commit matches exactly.
pub fn get_wheels_sanity_check(commit: Option<&str>) -> String {
    match commit {
        Some(commit) if !commit.is_empty() => format!(
            "python -c 'import ray; assert ray.__commit__ == \"{}\", ray.__commit__'",
            commit
        ),
        _ => "python -c 'import ray; print(\"No commit sanity check available, but this is the \
              Ray wheel commit:\", ray.__commit__)'"
            .to_string(),
    }
}
