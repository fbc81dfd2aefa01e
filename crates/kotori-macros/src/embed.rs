//! Compile-time resource embedding.
//!
//! The macro only discovers and reads files. Name normalization, extension
//! fallback and sub-path selection all happen at runtime in `kotori`, so
//! embedded and on-disk packages behave the same.

use proc_macro2::TokenStream;
use quote::quote;
use std::path::{Path, PathBuf};
use syn::LitStr;

/// Generates an `EmbeddedPackage` expression for the directory named by `input`.
pub fn embed_package_impl(input: LitStr) -> TokenStream {
    let dir_path = match resolve_path(&input.value()) {
        Ok(path) => path,
        Err(e) => return syn::Error::new(input.span(), e).to_compile_error(),
    };

    let files = match collect_files(&dir_path) {
        Ok(files) => files,
        Err(e) => return syn::Error::new(input.span(), e).to_compile_error(),
    };

    // Absolute, so debug hot-reload works from any working directory
    let absolute_path = dir_path.to_string_lossy().to_string();

    let entries: Vec<_> = files
        .iter()
        .map(|(name, content)| quote! { (#name, #content) })
        .collect();

    quote! {
        {
            static ENTRIES: &[(&str, &str)] = &[
                #(#entries),*
            ];
            ::kotori::EmbeddedPackage::new(ENTRIES, #absolute_path)
        }
    }
}

/// Resolves `path` against the manifest directory of the crate being compiled.
fn resolve_path(path: &str) -> Result<PathBuf, String> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map_err(|_| "CARGO_MANIFEST_DIR is not set".to_string())?;
    Ok(Path::new(&manifest_dir).join(path))
}

/// Collects `(relative_path, content)` for every UTF-8 file under `dir`, sorted by path.
fn collect_files(dir: &Path) -> Result<Vec<(String, String)>, String> {
    if !dir.exists() {
        return Err(format!("Directory not found: {}", dir.display()));
    }
    if !dir.is_dir() {
        return Err(format!("Path is not a directory: {}", dir.display()));
    }

    let mut files = Vec::new();
    collect_files_recursive(dir, dir, &mut files)?;

    // Deterministic output for reproducible builds
    files.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(files)
}

fn collect_files_recursive(
    current: &Path,
    root: &Path,
    files: &mut Vec<(String, String)>,
) -> Result<(), String> {
    let entries = std::fs::read_dir(current)
        .map_err(|e| format!("Failed to read {}: {}", current.display(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
        let path = entry.path();
        let is_symlink = entry
            .file_type()
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?
            .is_symlink();

        if path.is_dir() && is_symlink {
            continue;
        } else if path.is_dir() {
            collect_files_recursive(&path, root, files)?;
        } else if path.is_file() {
            let bytes = std::fs::read(&path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            let Ok(content) = String::from_utf8(bytes) else {
                continue;
            };

            let relative = path.strip_prefix(root).map_err(|_| {
                format!("Failed to compute relative path for {}", path.display())
            })?;
            let name = relative
                .to_string_lossy()
                .replace(std::path::MAIN_SEPARATOR, "/");

            files.push((name, content));
        }
    }

    Ok(())
}
