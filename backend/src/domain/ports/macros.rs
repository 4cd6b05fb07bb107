//! Helper macro generating port error enums with snake_case constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum LookupError {
            Offline { message: String } => "lookup offline: {message}",
            Throttled { retry_after_secs: u32 } => "throttled for {retry_after_secs}s",
            Partial { message: String, returned: u32 } => "partial ({returned}): {message}",
            Empty => "no rows",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(LookupError::offline("db down").to_string(), "lookup offline: db down");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        assert_eq!(LookupError::throttled(30_u32).to_string(), "throttled for 30s");
    }

    #[test]
    fn mixed_fields_and_unit_variants_are_supported() {
        assert_eq!(
            LookupError::partial("timeout", 3_u32).to_string(),
            "partial (3): timeout"
        );
        assert_eq!(LookupError::empty(), LookupError::Empty);
    }
}
