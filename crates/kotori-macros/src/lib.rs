//! Proc macros for kotori.
//!
//! [`embed_package!`] bakes a package's resource directory into the binary and
//! returns a `kotori::EmbeddedPackage` that can be registered with a
//! `PackageIndex`:
//!
//! - **Release builds**: embedded content only, no file I/O
//! - **Debug builds**: templates are read from the source directory while it exists
//!
//! See `kotori/tests/embed_package.rs` for working examples.

mod embed;

use proc_macro::TokenStream;
use syn::{parse_macro_input, LitStr};

/// Embeds every file below a directory at compile time.
///
/// The path is relative to the `Cargo.toml` of the crate invoking the macro.
/// Entries keep their relative path with extension (`view/dummy.html`), so a
/// package path like `app.view` finds them under the `view` sub-path.
///
/// Files that are not valid UTF-8 (images, fonts) are skipped.
///
/// ```rust,ignore
/// use kotori::{embed_package, PackageIndex};
///
/// let packages = PackageIndex::new().with_embedded("com.shiroyuki", embed_package!("resources"));
/// ```
///
/// # Compile-Time Errors
///
/// Fails to compile if the directory doesn't exist or cannot be read.
#[proc_macro]
pub fn embed_package(input: TokenStream) -> TokenStream {
    let path = parse_macro_input!(input as LitStr);
    embed::embed_package_impl(path).into()
}
