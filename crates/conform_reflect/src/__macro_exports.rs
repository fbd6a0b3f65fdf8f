//! Items used by the code `#[derive(Reflect)]` generates. Not public API.

pub use alloc::borrow::Cow;
pub use alloc::boxed::Box;
pub use alloc::vec;
pub use core::option::Option::{self, None, Some};
pub use core::result::Result::{self, Err, Ok};

// -----------------------------------------------------------------------------
// auto_register

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::info::Typed;
    use crate::registry::TypeRegistry;
    use crate::{FromRepr, Reflect};

    /// A registration function submitted by `#[reflect(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: Typed + Reflect + FromRepr> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    // Runs only where `inventory` works, which is how `auto_register`
    // detects platform support.
    inventory::submit! {
        __AutoRegisterFunc(TypeRegistry::mark_auto_registered)
    }

    pub(crate) fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
