use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Ensembl-style GTF, plain or gzip-compressed.
    pub gtf: PathBuf,
    /// `gene_id<TAB>transcript_id` table.
    pub canonical_transcripts: Option<PathBuf>,
    /// Protein-domain hits keyed by transcript id.
    pub protein_domains: Option<PathBuf>,
    /// JSON-lines destination.
    pub output: PathBuf,
}

impl BuildConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        // Relative paths are taken relative to the config file.
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }

        config.validate()?;
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.gtf);
        resolve(&mut self.output);
        if let Some(p) = self.canonical_transcripts.as_mut() {
            resolve(p);
        }
        if let Some(p) = self.protein_domains.as_mut() {
            resolve(p);
        }
    }

    fn validate(&self) -> Result<()> {
        validate_extension("gtf", &self.gtf, &["gtf", "gz"])?;
        for (name, path) in self.input_files() {
            if !path.is_file() {
                bail!("{name} file not found: {}", path.display());
            }
        }
        for (name, path) in self.table_files() {
            validate_extension(name, path, &["tsv", "txt", "gz"])?;
        }
        Ok(())
    }

    /// Iterate all input files uniformly as (name, path) pairs.
    pub fn input_files(&self) -> impl Iterator<Item = (&'static str, &Path)> {
        [("gtf", self.gtf.as_path())]
            .into_iter()
            .chain(self.table_files())
    }

    fn table_files(&self) -> impl Iterator<Item = (&'static str, &Path)> {
        self.canonical_transcripts
            .as_deref()
            .map(|p| ("canonical_transcripts", p))
            .into_iter()
            .chain(
                self.protein_domains
                    .as_deref()
                    .map(|p| ("protein_domains", p)),
            )
    }
}

fn validate_extension(name: &str, path: &Path, allowed: &[&str]) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !allowed.contains(&ext) {
        bail!(
            "unsupported extension for '{name}': {} (expected one of {})",
            path.display(),
            allowed.join(", ")
        );
    }
    Ok(())
}
