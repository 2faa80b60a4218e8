//! `define_port_error!`: the error enum shape shared by every ModeraFlow port.
//!
//! Each port declares its failure taxonomy (`AccessDenied`, `SchemaMismatch`,
//! `UniqueViolation`, `Transient` and so on) as a list of variants with a
//! display message. The macro derives `thiserror::Error` and adds, per
//! variant, a snake-case constructor taking `impl Into<_>` fields and an
//! `is_<variant>` predicate:
//!
//! ```ignore
//! define_port_error! {
//!     pub enum TenantRepositoryError {
//!         UniqueViolation { message: String } => "tenant record already exists: {message}",
//!         Transient { message: String } => "tenant store unavailable: {message}",
//!     }
//! }
//!
//! let err = TenantRepositoryError::unique_violation("tenants_pkey");
//! assert!(err.is_unique_violation());
//! ```

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = "Construct `" $variant "`."]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            #[doc = "Construct `" $variant "`."]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (@is $variant:ident) => {
        ::paste::paste! {
            #[doc = "Whether this is `" $variant "`."]
            pub fn [<is_ $variant:snake>](&self) -> bool {
                matches!(self, Self::$variant { .. })
            }
        }
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
                define_port_error!(@is $variant);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Generated constructors and predicates.
    use rstest::rstest;

    define_port_error! {
        pub enum StoreError {
            UniqueViolation { message: String } => "record already exists: {message}",
            NotFound { id: i64 } => "row {id} not found",
            Upstream { status: u16, message: String } => "upstream {status}: {message}",
            Closed => "store closed",
        }
    }

    #[rstest]
    fn string_fields_take_str() {
        let err = StoreError::unique_violation("tenants_pkey");
        assert_eq!(err.to_string(), "record already exists: tenants_pkey");
    }

    #[rstest]
    fn other_fields_keep_their_type() {
        assert_eq!(StoreError::not_found(7_i64).to_string(), "row 7 not found");
        assert_eq!(
            StoreError::upstream(429_u16, "slow down").to_string(),
            "upstream 429: slow down"
        );
    }

    #[rstest]
    fn unit_variants_get_constructors() {
        assert_eq!(StoreError::closed(), StoreError::Closed);
    }

    #[rstest]
    #[case(StoreError::unique_violation("dup"), true, false)]
    #[case(StoreError::not_found(1_i64), false, true)]
    #[case(StoreError::closed(), false, false)]
    fn predicates_match_their_variant(
        #[case] err: StoreError,
        #[case] unique: bool,
        #[case] missing: bool,
    ) {
        assert_eq!(err.is_unique_violation(), unique);
        assert_eq!(err.is_not_found(), missing);
        assert_eq!(err.is_closed(), !unique && !missing);
    }
}
