//! Macros for reducing boilerplate when defining models

/// Define a model type over [`Resource`](crate::core::entity::Resource)
///
/// Generates a newtype with `Deref`/`DerefMut` to the resource, `From`
/// conversions both ways and the [`Model`](crate::core::entity::Model)
/// implementation. The optional third argument adjusts the descriptor.
///
/// # Example
///
/// ```rust
/// use ldclient::impl_model;
/// use ldclient::prelude::*;
///
/// impl_model!(Widget, MediaTypeSource::Static("application/widget".into()), |d| {
///     d.include("all").always_present(["parts"])
/// });
///
/// let descriptor = Widget::descriptor();
/// assert_eq!(descriptor.name, "Widget");
/// assert_eq!(descriptor.always_present, vec!["parts"]);
/// ```
#[macro_export]
macro_rules! impl_model {
    ($type:ident, $media_type:expr) => {
        $crate::impl_model!($type, $media_type, |d| d);
    };

    ($type:ident, $media_type:expr, $configure:expr) => {
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $type($crate::core::entity::Resource);

        impl $crate::core::entity::Model for $type {
            const NAME: &'static str = stringify!($type);

            fn descriptor() -> $crate::core::descriptor::TypeDescriptor {
                let configure: fn(
                    $crate::core::descriptor::TypeDescriptor,
                ) -> $crate::core::descriptor::TypeDescriptor = $configure;
                configure($crate::core::descriptor::TypeDescriptor::new(
                    stringify!($type),
                    $media_type,
                ))
            }

            fn into_resource(self) -> $crate::core::entity::Resource {
                self.0
            }
        }

        impl From<$crate::core::entity::Resource> for $type {
            fn from(resource: $crate::core::entity::Resource) -> Self {
                Self(resource)
            }
        }

        impl From<$type> for $crate::core::entity::Resource {
            fn from(model: $type) -> Self {
                model.0
            }
        }

        impl ::std::ops::Deref for $type {
            type Target = $crate::core::entity::Resource;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl ::std::ops::DerefMut for $type {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }
    };
}
