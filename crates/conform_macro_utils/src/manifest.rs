use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use proc_macro2::Span;
use toml_edit::{Document, Item, Table};

/// Locate an accessible [`syn::Path`] for a workspace crate as seen from the
/// caller's Cargo.toml.
///
/// Derive output must name `conform_reflect` in a way that resolves from the
/// invoking crate, which may depend on `conform_reflect` directly or only on
/// the `conform` facade.
///
/// # Example
///
/// ```rust
/// # use conform_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("conform_reflect"));
/// ```
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies`, return `::crate_name`.
/// 2. If the name begins with `conform_` and the caller depends on the
///    facade `conform`, return `::conform::short_name`
///    (e.g. `conform_reflect` -> `::conform::reflect`).
/// 3. Repeat step 1-2 in `dev-dependencies`.
/// 4. Otherwise, fall back to the absolute path `::crate_name`.
///
/// A crate that references itself through derive output should declare
/// `extern crate self as conform_reflect;` in its root.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Option<Document<Box<str>>>,
    pub modified_time: Option<SystemTime>,
}

const FACADE_NAME: &str = "conform";
const FACADE_PREFIX: &str = "conform_";

impl Manifest {
    fn get_manifest_path() -> Option<PathBuf> {
        let mut path = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
        path.push("Cargo.toml");
        path.exists().then_some(path)
    }

    fn get_manifest_modified_time(path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
    }

    fn read_manifest(path: &Path) -> Option<Document<Box<str>>> {
        let manifest = std::fs::read_to_string(path).ok()?.into_boxed_str();
        Document::parse(manifest).ok()
    }

    // Crate names and identifiers coming from Cargo.toml always parse as paths.
    fn absolute(segments: &[&str]) -> syn::Path {
        let mut path = syn::Path {
            leading_colon: Some(Default::default()),
            segments: Default::default(),
        };
        for seg in segments {
            path.segments
                .push(syn::PathSegment::from(syn::Ident::new(seg, Span::call_site())));
        }
        path
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::absolute(&[name]));
        }
        let module = name.strip_prefix(FACADE_PREFIX)?;
        deps.contains_key(FACADE_NAME)
            .then(|| Self::absolute(&[FACADE_NAME, module]))
    }

    /// Return a [`syn::Path`] for the package named `name`.
    ///
    /// See the type-level documentation for the resolution order.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        let Some(manifest) = &self.manifest else {
            return Self::absolute(&[name]);
        };

        for section in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = manifest.get(section)
                && let Some(val) = Self::find_in_deps(deps, name)
            {
                return val;
            }
        }

        Self::absolute(&[name])
    }

    /// Obtain the [`Manifest`] of the caller's Cargo.toml.
    ///
    /// Parsed manifests are cached per path and refreshed when the file's
    /// modified time changes. A missing or unreadable manifest yields an empty
    /// `Manifest`, which resolves every crate to its absolute path.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let Some(manifest_path) = Self::get_manifest_path() else {
            return func(&Manifest {
                manifest: None,
                modified_time: None,
            });
        };
        let modified_time = Self::get_manifest_modified_time(&manifest_path);

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(manifest) = manifests.get(&manifest_path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }

        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&manifest_path),
            modified_time,
        };

        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;

    fn path_string(path: &syn::Path) -> String {
        let segs: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        format!("::{}", segs.join("::"))
    }

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: toml_edit::Document::parse(Box::<str>::from(text)).ok(),
            modified_time: None,
        }
    }

    #[test]
    fn direct_dependency() {
        let m = manifest("[dependencies]\nconform_reflect = \"0.0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("conform_reflect")), "::conform_reflect");
    }

    #[test]
    fn through_facade() {
        let m = manifest("[dependencies]\nconform = \"0.0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("conform_reflect")), "::conform::reflect");
    }

    #[test]
    fn dev_dependency_and_fallback() {
        let m = manifest("[dev-dependencies]\nconform = { path = \"..\" }\n");
        assert_eq!(path_string(&m.get_crate_path("conform_reflect")), "::conform::reflect");
        let empty = manifest("[package]\nname = \"x\"\n");
        assert_eq!(path_string(&empty.get_crate_path("conform_reflect")), "::conform_reflect");
    }
}
