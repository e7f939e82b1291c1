//! Restricted reader for mock `.cfg` files.
//!
//! Mock configs are Python fragments that fill a `config_opts` dict. Only
//! literal string assignments and `include(...)` directives are recognised;
//! everything else is skipped and never evaluated.

use crate::error::{MockError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const MAX_INCLUDE_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `config_opts['key'] = 'value'`
    Assign(String, String),
    /// `include('path')`
    Include(String),
}

fn assign_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^config_opts\s*\[\s*['"]([\w.-]+)['"]\s*\]\s*=\s*(?:'([^']*)'|"([^"]*)")\s*(?:#.*)?$"#,
        )
        .expect("valid assignment regex")
    })
}

fn include_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^include\(\s*(?:'([^']*)'|"([^"]*)")\s*\)\s*(?:#.*)?$"#)
            .expect("valid include regex")
    })
}

/// Scan config text for the directives we understand.
pub fn parse_directives(content: &str) -> Vec<Directive> {
    let mut directives = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(caps) = assign_re().captures(line) {
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            directives.push(Directive::Assign(caps[1].to_string(), value.to_string()));
        } else if let Some(caps) = include_re().captures(line) {
            let target = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            directives.push(Directive::Include(target.to_string()));
        }
    }

    directives
}

/// Collected `config_opts` entries; later assignments win.
#[derive(Debug, Default, Clone)]
pub struct ConfigOpts {
    opts: BTreeMap<String, String>,
}

impl ConfigOpts {
    /// Read `path` and any files it includes, relative to `config_dir`.
    pub fn load(path: &Path, config_dir: &Path) -> Result<Self> {
        let mut opts = Self::default();
        opts.load_into(path, config_dir, 0)?;
        Ok(opts)
    }

    fn load_into(&mut self, path: &Path, config_dir: &Path, depth: usize) -> Result<()> {
        if depth > MAX_INCLUDE_DEPTH {
            return Err(MockError::Config {
                path: path.to_path_buf(),
                reason: format!("includes nested deeper than {}", MAX_INCLUDE_DEPTH),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| MockError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        for directive in parse_directives(&content) {
            match directive {
                Directive::Assign(key, value) => {
                    self.opts.insert(key, value);
                }
                Directive::Include(target) => {
                    let target = PathBuf::from(target);
                    let target = if target.is_absolute() {
                        target
                    } else {
                        config_dir.join(target)
                    };
                    self.load_into(&target, config_dir, depth + 1)?;
                }
            }
        }

        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.opts.get(key).map(String::as_str)
    }
}

/// Read the chroot root name from a mock config file.
pub fn read_root(path: &Path, config_dir: &Path) -> Result<String> {
    let opts = ConfigOpts::load(path, config_dir)?;
    let root = opts.get("root").ok_or_else(|| MockError::Config {
        path: path.to_path_buf(),
        reason: "no literal config_opts['root'] assignment".to_string(),
    })?;

    if root.is_empty() || root.contains("{{") {
        return Err(MockError::Config {
            path: path.to_path_buf(),
            reason: format!("unusable root value '{}'", root),
        });
    }

    Ok(root.to_string())
}
