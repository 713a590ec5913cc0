/// Declare a state struct together with its patch type.
///
/// The macro emits the struct as written, a companion patch struct whose
/// fields are all `Option`s, chained setters on the patch, and a
/// [`ModelState`](crate::ModelState) implementation. Merging takes every
/// `Some` field of the patch and keeps the rest. Equality compares each
/// field with its own `PartialEq`; hold nested data in
/// [`Shared`](crate::Shared) to compare it by identity instead.
///
/// The struct must be `Clone` and every field `PartialEq`. Setters take the
/// field type itself, so integer literals infer to it.
///
/// # Examples
///
/// ```
/// use modelcell::{model_state, Model};
///
/// model_state! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub struct Player => PlayerPatch {
///         pub name: String,
///         pub score: u32,
///     }
/// }
///
/// let model = Model::new(Player { name: "ada".into(), score: 0 });
/// model.set_state(PlayerPatch::default().score(10));
///
/// assert_eq!(model.state(), Player { name: "ada".into(), score: 10 });
/// ```
#[macro_export]
macro_rules! model_state {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $patch:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        #[doc = concat!("Partial update for [`", stringify!($name), "`].")]
        #[derive(Clone, Default)]
        $vis struct $patch {
            $(
                $field_vis $field: ::core::option::Option<$ty>,
            )*
        }

        #[allow(dead_code)]
        impl $patch {
            $(
                #[doc = concat!("Set `", stringify!($field), "` in this patch.")]
                pub fn $field(mut self, value: $ty) -> Self {
                    self.$field = ::core::option::Option::Some(value);
                    self
                }
            )*
        }

        impl $crate::ModelState for $name {
            type Partial = $patch;

            fn merge(&self, partial: $patch) -> Self {
                Self {
                    $(
                        $field: match partial.$field {
                            ::core::option::Option::Some(value) => value,
                            ::core::option::Option::None => {
                                ::core::clone::Clone::clone(&self.$field)
                            }
                        },
                    )*
                }
            }

            fn shallow_eq(&self, other: &Self) -> bool {
                true $(&& self.$field == other.$field)*
            }
        }
    };
}
