use std::borrow::Cow;
use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    /// The shader file could not be read. Shaders are required; callers treat
    /// this as fatal.
    #[error("shader source {} is missing", path.display())]
    Missing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Shader source text with `%%TOKEN%%` placeholders.
///
/// Placeholders are substituted textually before compilation, e.g.
/// `array<vec4<f32>, %%NUMBER_OF_OBJECTS%%>`. Tokens without a supplied
/// value are left in place (and will most likely fail compilation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderTemplate {
    label: String,
    source: String,
}

impl ShaderTemplate {
    pub fn new(label: impl Into<String>, source: impl Into<String>) -> Self {
        Self { label: label.into(), source: source.into() }
    }

    /// Reads a template from disk. The file name becomes the label.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Missing {
            path: path.to_path_buf(),
            source,
        })?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::debug!("loaded shader template {} ({} bytes)", path.display(), source.len());
        Ok(Self::new(label, source))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitutes every `%%KEY%%` for each `(KEY, value)` pair.
    pub fn render<V: Display>(&self, values: &[(&str, V)]) -> String {
        let mut out = self.source.clone();
        for (key, value) in values {
            out = out.replace(&format!("%%{key}%%"), &value.to_string());
        }
        for token in unresolved_tokens(&out) {
            log::debug!("{}: placeholder %%{token}%% has no value", self.label);
        }
        out
    }

    /// Renders the template and compiles it as WGSL.
    pub fn compile<V: Display>(&self, device: &wgpu::Device, values: &[(&str, V)]) -> wgpu::ShaderModule {
        let source = self.render(values);
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label.as_str()),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(source)),
        })
    }
}

/// Names of `%%TOKEN%%` placeholders still present in `src`.
///
/// A token is one or more of `[A-Z0-9_]` between two `%%` markers.
pub fn unresolved_tokens(src: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = src;
    while let Some(start) = rest.find("%%") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("%%") else { break };
        let name = &after[..end];
        let valid = !name.is_empty()
            && name.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');
        if valid {
            tokens.push(name);
            rest = &after[end + 2..];
        } else {
            rest = after;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_every_occurrence() {
        let t = ShaderTemplate::new(
            "t",
            "var<uniform> a: array<vec4<f32>, %%N%%>;\nvar<uniform> b: array<vec4<f32>, %%N%%>;",
        );
        let out = t.render(&[("N", 12)]);
        assert_eq!(
            out,
            "var<uniform> a: array<vec4<f32>, 12>;\nvar<uniform> b: array<vec4<f32>, 12>;"
        );
    }

    #[test]
    fn unknown_tokens_are_left_alone() {
        let t = ShaderTemplate::new("t", "%%A%% %%B%%");
        assert_eq!(t.render(&[("A", "x")]), "x %%B%%");
        assert_eq!(unresolved_tokens("x %%B%%"), vec!["B"]);
    }

    #[test]
    fn modulo_operators_are_not_tokens() {
        assert!(unresolved_tokens("let a = b % c; let d = e % f;").is_empty());
        assert_eq!(unresolved_tokens("a %% b %%WORKGROUP_SIZE%%"), vec!["WORKGROUP_SIZE"]);
    }

    #[test]
    fn no_values_returns_source() {
        let t = ShaderTemplate::new("t", "fn main() {}");
        assert_eq!(t.render::<u32>(&[]), "fn main() {}");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ShaderTemplate::load("/nonexistent/algol/compute.wgsl").unwrap_err();
        let ShaderError::Missing { path, source } = err;
        assert_eq!(path, PathBuf::from("/nonexistent/algol/compute.wgsl"));
        assert_eq!(source.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn load_uses_file_name_as_label() {
        let path = std::env::temp_dir().join(format!("algol-shader-{}.wgsl", std::process::id()));
        std::fs::write(&path, "// %%N%%").unwrap();
        let t = ShaderTemplate::load(&path).unwrap();
        assert_eq!(t.label(), path.file_name().unwrap().to_string_lossy());
        assert_eq!(t.render(&[("N", 3)]), "// 3");
        let _ = std::fs::remove_file(&path);
    }
}
