//! Typed binding of documents to Rust values.
//!
//! [`FromTokens`] reads one value from a [`Tokenizer`] given the token that
//! starts it. Implementations exist for booleans, integers (range-checked),
//! floats, strings, `Vec<T>`, fixed-size arrays and `Option<T>`; structs opt
//! in with [`bind_struct!`](crate::bind_struct).
//!
//! ```rust
//! use jsonpull::{bind, bind_struct};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Node {
//!     name: String,
//!     children: Vec<u32>,
//!     weight: Option<f64>,
//! }
//!
//! bind_struct!(Node {
//!     name: String,
//!     children: Vec<u32>,
//!     weight: Option<f64>,
//! });
//!
//! let mut input = br#"{"name": "root", "children": [1, 2]}"#.to_vec();
//! let node: Node = bind::from_slice(&mut input).unwrap();
//! assert_eq!(node.children, [1, 2]);
//! assert_eq!(node.weight, None);
//!
//! let mut input = br#"{"name": "root", "children": [1, -2]}"#.to_vec();
//! let error = bind::from_slice::<Node>(&mut input).unwrap_err();
//! assert_eq!(
//!     error.to_string(),
//!     "$.children[1]: expected unsigned integer, found int at byte 33"
//! );
//! ```

use alloc::{
    borrow::ToOwned,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use bstr::ByteSlice;
use thiserror::Error;

use crate::{DecodeError, SyntaxError, Token, TokenKind, Tokenizer, TokenizerOptions};

mod path;


pub use path::Path;

/// A failure to bind a document to a Rust value.
///
/// Every variant carries the byte offset of the offending token, see
/// [`BindError::offset`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The document is malformed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A value has the wrong kind.
    #[error("{path}: expected {expected}, found {found} at byte {offset}")]
    Type {
        /// Where the value sits in the document.
        path: String,
        /// What the target type accepts.
        expected: &'static str,
        /// What the document contains.
        found: TokenKind,
        /// Byte offset of the value.
        offset: usize,
    },

    /// An integer does not fit the target type.
    #[error("{path}: value out of range [{min}, {max}] at byte {offset}")]
    Range {
        /// Where the value sits in the document.
        path: String,
        /// Smallest accepted value.
        min: i128,
        /// Largest accepted value.
        max: i128,
        /// Byte offset of the value.
        offset: usize,
    },

    /// An array does not have the length of the target array type.
    #[error("{path}: expected {expected} elements, found {len} at byte {offset}")]
    Length {
        /// Where the array sits in the document.
        path: String,
        /// Required number of elements.
        expected: usize,
        /// Number of elements in the document.
        len: usize,
        /// Byte offset of the opening bracket.
        offset: usize,
    },

    /// An object has a member the target struct does not declare.
    #[error("{path}: unknown key {key:?} at byte {offset}")]
    UnknownKey {
        /// Where the object sits in the document.
        path: String,
        /// The member name, decoded lossily.
        key: String,
        /// Byte offset of the member name.
        offset: usize,
    },

    /// An object lacks a required member.
    #[error("{path}: missing key {key:?} at byte {offset}")]
    MissingKey {
        /// Where the object sits in the document.
        path: String,
        /// The member name.
        key: &'static str,
        /// Byte offset of the opening brace.
        offset: usize,
    },

    /// A value could not be decoded.
    #[error("{path}: {source} at byte {offset}")]
    Decode {
        /// Where the value sits in the document.
        path: String,
        /// The decoding failure.
        source: DecodeError,
        /// Byte offset of the value.
        offset: usize,
    },
}

impl BindError {
    /// Byte offset in the document the error refers to.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Syntax(error) => error.offset,
            Self::Type { offset, .. }
            | Self::Range { offset, .. }
            | Self::Length { offset, .. }
            | Self::UnknownKey { offset, .. }
            | Self::MissingKey { offset, .. }
            | Self::Decode { offset, .. } => *offset,
        }
    }
}

/// Types that can be read from a token stream.
pub trait FromTokens: Sized {
    /// Whether an object member of this type must be present.
    const REQUIRED: bool = true;

    /// Reads the value starting at `token`, consuming all of its tokens.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] if the document is malformed or the value does
    /// not match `Self`.
    fn from_tokens(
        tokenizer: &mut Tokenizer<'_>,
        token: Token,
        path: &Path<'_>,
    ) -> Result<Self, BindError>;
}

/// Reads one document into `T`, requiring the document to end afterwards.
///
/// Strings are decoded in place, so `input` is modified. Resolve error
/// offsets against a copy of the original bytes.
///
/// # Errors
///
/// Returns a [`BindError`] if the document is malformed, has trailing
/// content, or does not match `T`.
pub fn from_slice<T: FromTokens>(input: &mut [u8]) -> Result<T, BindError> {
    from_slice_with_options(input, TokenizerOptions::default())
}

/// [`from_slice`] with explicit tokenizer options.
///
/// [`TokenizerOptions::reject_trailing`] is always turned on.
///
/// # Errors
///
/// See [`from_slice`].
pub fn from_slice_with_options<T: FromTokens>(
    input: &mut [u8],
    options: TokenizerOptions,
) -> Result<T, BindError> {
    let options = TokenizerOptions {
        reject_trailing: true,
        ..options
    };
    let mut tokenizer = Tokenizer::with_options(input, options);
    let root = tokenizer.next();
    let value = T::from_tokens(&mut tokenizer, root, &Path::Root)?;
    let _eof = tokenizer.next().into_result()?;
    Ok(value)
}

/// A member declared by a bound struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The member name in the document.
    pub name: &'static str,
    /// Whether the member must be present.
    pub required: bool,
}

/// What [`read_object`] does with members not listed in its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Fail with [`BindError::UnknownKey`].
    #[default]
    Reject,
    /// Skip the member's value.
    Skip,
}

/// Reads the members of the object starting at `token`.
///
/// For each member named in `fields`, `assign` is called with the field's
/// index, the token starting its value, and the member's path; it must
/// consume the whole value. Afterwards every required field must have been
/// seen, otherwise the error points at the opening brace.
///
/// # Errors
///
/// Returns a [`BindError`] if `token` is not an object, a member is unknown
/// (under [`UnknownKeys::Reject`]), a required member is missing, or
/// `assign` fails.
pub fn read_object<F>(
    tokenizer: &mut Tokenizer<'_>,
    token: Token,
    path: &Path<'_>,
    fields: &[Field],
    unknown: UnknownKeys,
    mut assign: F,
) -> Result<(), BindError>
where
    F: FnMut(&mut Tokenizer<'_>, usize, Token, &Path<'_>) -> Result<(), BindError>,
{
    expect_kind(&token, |kind| kind == TokenKind::Object, "object", path)?;
    let start = token.location();
    let mut found = vec![false; fields.len()];

    while let Some(key) = tokenizer.next_item()? {
        let key_offset = key.location();
        let name = tokenizer.parse_string(key);
        let Some(index) = fields.iter().position(|field| name == field.name) else {
            if unknown == UnknownKeys::Reject {
                return Err(BindError::UnknownKey {
                    path: path.to_string(),
                    key: name.to_str_lossy().into_owned(),
                    offset: key_offset,
                });
            }
            let value = tokenizer.next();
            tokenizer.skip(&value)?;
            continue;
        };

        found[index] = true;
        let value = tokenizer.next();
        assign(tokenizer, index, value, &path.key(fields[index].name))?;
    }

    let missing = fields
        .iter()
        .zip(&found)
        .find(|(field, found)| field.required && !**found);
    if let Some((field, _)) = missing {
        return Err(BindError::MissingKey {
            path: path.to_string(),
            key: field.name,
            offset: start,
        });
    }
    Ok(())
}

/// Implements [`FromTokens`](crate::bind::FromTokens) for a struct that
/// implements `Default`.
///
/// Each listed member is read with its type's `FromTokens` impl. Members
/// marked `#[optional]` keep their default value when absent, as do members
/// of type `Option<T>`. `#[ignore_unknown]` before the struct name skips
/// members that are not listed instead of failing.
///
/// ```rust
/// use jsonpull::{bind, bind_struct};
///
/// #[derive(Default)]
/// struct Asset {
///     version: String,
///     generator: String,
/// }
///
/// bind_struct!(#[ignore_unknown] Asset {
///     version: String,
///     #[optional] generator: String,
/// });
///
/// let mut input = br#"{"version": "2.0", "copyright": "none"}"#.to_vec();
/// let asset: Asset = bind::from_slice(&mut input).unwrap();
/// assert_eq!(asset.version, "2.0");
/// assert_eq!(asset.generator, "");
/// ```
#[macro_export]
macro_rules! bind_struct {
    (@required optional) => { false };
    (@required) => { true };
    (@unknown ignore_unknown) => { $crate::bind::UnknownKeys::Skip };
    (@unknown) => { $crate::bind::UnknownKeys::Reject };

    (
        $(#[$policy:ident])?
        $name:ident {
            $( $(#[$flag:ident])? $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        impl $crate::bind::FromTokens for $name {
            fn from_tokens(
                tokenizer: &mut $crate::Tokenizer<'_>,
                token: $crate::Token,
                path: &$crate::bind::Path<'_>,
            ) -> ::core::result::Result<Self, $crate::bind::BindError> {
                const FIELDS: &[$crate::bind::Field] = &[
                    $(
                        $crate::bind::Field {
                            name: ::core::stringify!($field),
                            required: $crate::bind_struct!(@required $($flag)?)
                                && <$ty as $crate::bind::FromTokens>::REQUIRED,
                        },
                    )*
                ];

                let mut value = <Self as ::core::default::Default>::default();
                $crate::bind::read_object(
                    tokenizer,
                    token,
                    path,
                    FIELDS,
                    $crate::bind_struct!(@unknown $($policy)?),
                    |tokenizer, index, token, path| {
                        let name = FIELDS[index].name;
                        $(
                            if name == ::core::stringify!($field) {
                                value.$field =
                                    <$ty as $crate::bind::FromTokens>::from_tokens(tokenizer, token, path)?;
                                return ::core::result::Result::Ok(());
                            }
                        )*
                        ::core::result::Result::Ok(())
                    },
                )?;
                ::core::result::Result::Ok(value)
            }
        }
    };
}

/// Fails unless `token` is a value of an accepted kind.
fn expect_kind(
    token: &Token,
    accepts: impl Fn(TokenKind) -> bool,
    expected: &'static str,
    path: &Path<'_>,
) -> Result<(), BindError> {
    if let Some(error) = token.syntax_error() {
        return Err(error.into());
    }
    if accepts(token.kind()) {
        return Ok(());
    }
    Err(BindError::Type {
        path: path.to_string(),
        expected,
        found: token.kind(),
        offset: token.location(),
    })
}

fn decode_error(path: &Path<'_>, offset: usize, source: DecodeError) -> BindError {
    BindError::Decode {
        path: path.to_string(),
        source,
        offset,
    }
}

impl FromTokens for bool {
    fn from_tokens(
        tokenizer: &mut Tokenizer<'_>,
        token: Token,
        path: &Path<'_>,
    ) -> Result<Self, BindError> {
        expect_kind(&token, |kind| kind == TokenKind::Bool, "boolean", path)?;
        Ok(tokenizer.parse_bool(&token))
    }
}

macro_rules! impl_signed {
    ($($ty:ty),+) => {
        $(
            impl FromTokens for $ty {
                #[allow(clippy::cast_lossless)]
                fn from_tokens(
                    tokenizer: &mut Tokenizer<'_>,
                    token: Token,
                    path: &Path<'_>,
                ) -> Result<Self, BindError> {
                    expect_kind(
                        &token,
                        |kind| matches!(kind, TokenKind::Int | TokenKind::UInt),
                        "integer",
                        path,
                    )?;
                    let out_of_range = || BindError::Range {
                        path: path.to_string(),
                        min: <$ty>::MIN as i128,
                        max: <$ty>::MAX as i128,
                        offset: token.location(),
                    };
                    let value = tokenizer.parse_int(&token).map_err(|_| out_of_range())?;
                    <$ty>::try_from(value).map_err(|_| out_of_range())
                }
            }
        )+
    };
}

impl_signed!(i8, i16, i32, i64, isize);

macro_rules! impl_unsigned {
    ($($ty:ty),+) => {
        $(
            impl FromTokens for $ty {
                #[allow(clippy::cast_lossless)]
                fn from_tokens(
                    tokenizer: &mut Tokenizer<'_>,
                    token: Token,
                    path: &Path<'_>,
                ) -> Result<Self, BindError> {
                    expect_kind(
                        &token,
                        |kind| kind == TokenKind::UInt,
                        "unsigned integer",
                        path,
                    )?;
                    let out_of_range = || BindError::Range {
                        path: path.to_string(),
                        min: 0,
                        max: <$ty>::MAX as i128,
                        offset: token.location(),
                    };
                    let value = tokenizer.parse_uint(&token).map_err(|_| out_of_range())?;
                    <$ty>::try_from(value).map_err(|_| out_of_range())
                }
            }
        )+
    };
}

impl_unsigned!(u8, u16, u32, u64, usize);

impl FromTokens for f64 {
    fn from_tokens(
        tokenizer: &mut Tokenizer<'_>,
        token: Token,
        path: &Path<'_>,
    ) -> Result<Self, BindError> {
        expect_kind(&token, TokenKind::is_number, "number", path)?;
        tokenizer
            .parse_float(&token)
            .map_err(|source| decode_error(path, token.location(), source))
    }
}

impl FromTokens for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_tokens(
        tokenizer: &mut Tokenizer<'_>,
        token: Token,
        path: &Path<'_>,
    ) -> Result<Self, BindError> {
        f64::from_tokens(tokenizer, token, path).map(|value| value as f32)
    }
}

impl FromTokens for String {
    fn from_tokens(
        tokenizer: &mut Tokenizer<'_>,
        token: Token,
        path: &Path<'_>,
    ) -> Result<Self, BindError> {
        expect_kind(&token, |kind| kind == TokenKind::String, "string", path)?;
        let offset = token.location();
        tokenizer
            .parse_str(token)
            .map(ToOwned::to_owned)
            .map_err(|source| decode_error(path, offset, source))
    }
}

impl<T: FromTokens> FromTokens for Vec<T> {
    fn from_tokens(
        tokenizer: &mut Tokenizer<'_>,
        token: Token,
        path: &Path<'_>,
    ) -> Result<Self, BindError> {
        expect_kind(&token, |kind| kind == TokenKind::Array, "array", path)?;
        let mut items = Vec::new();
        while let Some(item) = tokenizer.next_item()? {
            let item_path = path.index(items.len());
            items.push(T::from_tokens(tokenizer, item, &item_path)?);
        }
        Ok(items)
    }
}

impl<T: FromTokens, const N: usize> FromTokens for [T; N] {
    fn from_tokens(
        tokenizer: &mut Tokenizer<'_>,
        token: Token,
        path: &Path<'_>,
    ) -> Result<Self, BindError> {
        let offset = token.location();
        let items = Vec::<T>::from_tokens(tokenizer, token, path)?;
        items.try_into().map_err(|items: Vec<T>| BindError::Length {
            path: path.to_string(),
            expected: N,
            len: items.len(),
            offset,
        })
    }
}

impl<T: FromTokens> FromTokens for Option<T> {
    const REQUIRED: bool = false;

    fn from_tokens(
        tokenizer: &mut Tokenizer<'_>,
        token: Token,
        path: &Path<'_>,
    ) -> Result<Self, BindError> {
        if token.kind() == TokenKind::Null {
            return Ok(None);
        }
        T::from_tokens(tokenizer, token, path).map(Some)
    }
}
