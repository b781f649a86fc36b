// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros for the record and status types.

/// Give a fieldless enum its wire text: `as_str()` plus a matching
/// `Display`.
///
/// ```ignore
/// crate::simple_display! {
///     RequestStatus {
///         Pending => "pending",
///         Running => "running",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident => $text:expr ),+ $(,)? }) => {
        impl $enum {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Test fixtures for a record type: `Record::builder()` starts from the
/// listed defaults and each field gets a chainable setter.
///
/// `into` setters accept `impl Into<T>`, `set` setters take `T`, and
/// `option` fields are `Option<T>` on the record with setters that take
/// the inner value. Only compiled for tests and the `test-support` feature.
///
/// ```ignore
/// crate::builder! {
///     pub struct WorkspaceBuilder => Workspace {
///         into { name: String = "workspace" }
///         set { is_archived: bool = false }
///         option { project: ProjectId = None }
///     }
/// }
/// ```
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $record:ident {
            $(into { $( $i_field:ident : $i_ty:ty = $i_default:expr ),* $(,)? })?
            $(set { $( $s_field:ident : $s_ty:ty = $s_default:expr ),* $(,)? })?
            $(option { $( $o_field:ident : $o_ty:ty = $o_default:expr ),* $(,)? })?
        }
    ) => {
        /// Fixture builder holding a complete record.
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder($record);

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                $builder($record {
                    $($( $i_field: $i_default.into(), )*)?
                    $($( $s_field: $s_default, )*)?
                    $($( $o_field: $o_default, )*)?
                })
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $($(
                pub fn $i_field(mut self, value: impl Into<$i_ty>) -> Self {
                    self.0.$i_field = value.into();
                    self
                }
            )*)?
            $($(
                pub fn $s_field(mut self, value: $s_ty) -> Self {
                    self.0.$s_field = value;
                    self
                }
            )*)?
            $($(
                pub fn $o_field(mut self, value: impl Into<$o_ty>) -> Self {
                    self.0.$o_field = Some(value.into());
                    self
                }
            )*)?

            pub fn build(self) -> $record {
                self.0
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $record {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}
