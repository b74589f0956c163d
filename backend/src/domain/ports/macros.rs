//! Macro generating message-carrying port error enums.
//!
//! Every variant holds a single `message: String`. The macro derives
//! `thiserror::Error`, adds a snake_case constructor per variant accepting
//! `impl Into<String>`, and a `message()` accessor for the raw detail.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $display:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant {
                    /// Adapter-supplied detail.
                    message: String,
                },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = "Build the `" $variant "` variant."]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                }
            )+

            /// Adapter-supplied detail without the variant prefix.
            #[must_use]
            pub fn message(&self) -> &str {
                match self {
                    $(Self::$variant { message })|+ => message,
                }
            }
        }
    };
}

pub(crate) use define_port_error;
