#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use conform_format as format;
pub use conform_reflect as reflect;
pub use conform_utils as utils;

pub use conform_reflect::{
    Error, ErrorKind, Result, from_representation, from_representation_with, to_representation,
    to_representation_with,
};

/// The common imports for deriving and converting.
pub mod prelude {
    pub use conform_format::{Format, FormatError};
    pub use conform_reflect::derive::Reflect;
    pub use conform_reflect::policy::{Coerce, CoercionPolicy, Strict};
    pub use conform_reflect::value::{Mapping, Value};
    pub use conform_reflect::info::Typed;
    pub use conform_reflect::{FromRepr, Reflect};
    pub use conform_reflect::{from_representation_with, to_representation_with};

    #[cfg(feature = "json")]
    pub use conform_format::{
        JsonOptions, from_json, from_json_with, from_json_with_options, to_json, to_json_with,
        to_json_with_options,
    };
    #[cfg(feature = "ron")]
    pub use conform_format::{
        RonOptions, from_ron, from_ron_with, from_ron_with_options, to_ron, to_ron_with,
        to_ron_with_options,
    };
    #[cfg(feature = "toml")]
    pub use conform_format::{
        TomlOptions, from_toml, from_toml_with, from_toml_with_options, to_toml, to_toml_with,
        to_toml_with_options,
    };
}
