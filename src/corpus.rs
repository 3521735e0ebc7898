// Corpus loading from disk.
//
// Two layouts are supported:
//   - a directory where every (non-hidden) file is one document, ordered by
//     file name so the row order of every run is the same
//   - a single text file where documents are separated by blank lines
//
// The detector itself never sees file names; they only travel alongside the
// texts for reporting.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

/// One document of a corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// File name, or "#<n>" for documents read from a single file
    pub name: String,
    pub text: String,
}

/// An ordered set of documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Corpus {
    pub documents: Vec<Document>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document texts in corpus order, ready for the detector.
    pub fn texts(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.text.clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.name.as_str()).collect()
    }

    /// Index of the document called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.name == name)
    }
}

/// Load a corpus from a directory or a single blank-line separated file.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    if path.is_dir() {
        load_corpus_dir(path)
    } else {
        load_corpus_file(path)
    }
}

/// Every regular, non-hidden file in `dir` is one document, sorted by name.
pub fn load_corpus_dir(dir: &Path) -> Result<Corpus> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Reading {}", dir.display()))? {
        let path = entry?.path();
        let hidden = path.file_name().map_or(false, is_hidden);
        if path.is_file() && !hidden {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Reading document {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        documents.push(Document { name, text });
    }

    if documents.is_empty() {
        anyhow::bail!("No documents found in {}", dir.display());
    }

    info!(path = %dir.display(), documents = documents.len(), "Loaded corpus directory");
    Ok(Corpus { documents })
}

/// Dotfiles only. Names that aren't valid UTF-8 are still documents.
fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Documents in one file, separated by one or more blank lines.
pub fn load_corpus_file(file: &Path) -> Result<Corpus> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Reading {}", file.display()))?;

    let documents: Vec<Document> = split_blank_lines(&content)
        .into_iter()
        .enumerate()
        .map(|(i, text)| Document {
            name: format!("#{}", i + 1),
            text,
        })
        .collect();

    if documents.is_empty() {
        anyhow::bail!("No documents found in {}", file.display());
    }

    info!(path = %file.display(), documents = documents.len(), "Loaded corpus file");
    Ok(Corpus { documents })
}

fn split_blank_lines(content: &str) -> Vec<String> {
    let mut docs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                docs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        docs.push(current.join("\n"));
    }
    docs
}
