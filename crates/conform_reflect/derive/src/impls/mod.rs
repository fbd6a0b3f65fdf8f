// -----------------------------------------------------------------------------
// Modules

mod match_reflect;

mod enum_kind;
mod struct_kind;
mod tuple_struct_kind;
mod unit_kind;

mod auto_register;
mod trait_reflect;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use match_reflect::match_reflect_impls;

use auto_register::get_auto_register_impl;
use enum_kind::impl_enum;
use struct_kind::impl_struct;
use trait_reflect::impl_trait_reflect;
use trait_typed::impl_trait_typed;
use tuple_struct_kind::impl_tuple_struct;
use unit_kind::impl_unit;
