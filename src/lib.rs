//! flatrec - Schema-less flat record serializer
//!
//! Converts a self-describing object into a flat `"key":"value"` record and
//! rebuilds an object from such text with no schema, inferring each value's
//! scalar type and picking a matching constructor or falling back to a
//! default constructor plus member assignment.
//!
//! # Example
//!
//! ```rust
//! use flatrec::{field, Reflect, Serializer, TypeDescriptor};
//!
//! #[derive(Debug, PartialEq)]
//! struct Text {
//!     mas: Vec<i32>,
//!     i1: i32,
//!     i2: i32,
//! }
//!
//! impl Default for Text {
//!     fn default() -> Self {
//!         Self { mas: vec![1, 2], i1: 1, i2: 2 }
//!     }
//! }
//!
//! impl Reflect for Text {
//!     fn describe() -> TypeDescriptor<Self> {
//!         TypeDescriptor::new("Text")
//!             .member(field!(Text, mas: Vec<i32>))
//!             .member(field!(Text, i1: i32))
//!             .member(field!(Text, i2: i32))
//!             .default_constructor(Text::default)
//!     }
//! }
//!
//! let mut serializer = Serializer::new(Text { mas: vec![1, 2], i1: 7, i2: 8 });
//! serializer.serialize().unwrap();
//! assert_eq!(serializer.text(), r#"{"mas":"1,2,","i1":"7","i2":"8",}"#);
//!
//! let back = serializer.deserialize(&serializer.text()).unwrap();
//! assert_eq!((back.i1, back.i2), (7, 8));
//! ```

mod types;
mod reflect;
mod encode;
mod wire;
mod infer;
mod builder;
mod serializer;
mod json_bridge;
mod error;

pub use types::*;
pub use reflect::*;
pub use encode::*;
pub use wire::*;
pub use infer::*;
pub use builder::*;
pub use serializer::*;
pub use json_bridge::*;
pub use error::*;
