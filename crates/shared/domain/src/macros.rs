/// Enum stored and transmitted as a fixed lowercase string.
///
/// Generates `as_str`, `FromStr` (unknown values are a validation error),
/// `Display` and `From<_> for String`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $value:expr ),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        $(#[$meta])*
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $value ),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( v if v == $value => Ok($name::$variant), )+
                    other => Err($crate::error::DomainError::validation(format!(
                        "Invalid {} '{}'",
                        $label, other
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}
