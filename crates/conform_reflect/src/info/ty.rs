use alloc::string::String;
use core::any::{Any, TypeId};
use core::fmt;

// -----------------------------------------------------------------------------
// Type

/// Identity and names of a reflected type.
///
/// `path` is the full path as reported by [`core::any::type_name`], `name`
/// is the same with every module prefix removed.
///
/// # Examples
///
/// ```
/// use conform_reflect::info::Type;
///
/// let ty = Type::of::<Vec<String>>();
/// assert_eq!(ty.path(), "alloc::vec::Vec<alloc::string::String>");
/// assert_eq!(ty.name(), "Vec<String>");
/// assert!(ty.is::<Vec<String>>());
/// ```
#[derive(Clone)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    name: String,
}

impl Type {
    pub fn of<T: ?Sized + Any>() -> Self {
        let path = core::any::type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            path,
            name: short_name(path),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is<T: ?Sized + Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

fn short_name(path: &str) -> String {
    fn last_segment(s: &str) -> &str {
        s.rsplit("::").next().unwrap_or(s)
    }

    let mut out = String::with_capacity(path.len());
    let mut start = 0;
    for (i, c) in path.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' | '*') {
            out.push_str(last_segment(&path[start..i]));
            out.push(c);
            start = i + c.len_utf8();
        }
    }
    out.push_str(last_segment(&path[start..]));
    out
}

#[cfg(test)]
mod tests {
    use super::short_name;

    #[test]
    fn short_names() {
        assert_eq!(short_name("u8"), "u8");
        assert_eq!(short_name("my::config::Page<alloc::string::String>"), "Page<String>");
        assert_eq!(
            short_name("(core::option::Option<a::B>, [u8; 4])"),
            "(Option<B>, [u8; 4])"
        );
    }
}
