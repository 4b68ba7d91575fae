//! Self-description contract
//!
//! A serializable type implements [`Reflect`] and returns a
//! [`TypeDescriptor`] listing its members, its typed constructors and an
//! optional no-argument constructor. The [`field!`], [`property!`] and
//! [`constructor!`] macros build the descriptors from plain Rust fields,
//! accessor methods and constructor functions.
//!
//! # Example
//!
//! ```rust
//! use flatrec::{constructor, field, Reflect, TypeDescriptor};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Point {
//!     fn new(x: i32, y: i32) -> Self {
//!         Self { x, y }
//!     }
//! }
//!
//! impl Reflect for Point {
//!     fn describe() -> TypeDescriptor<Self> {
//!         TypeDescriptor::new("Point")
//!             .member(field!(Point, x: i32))
//!             .member(field!(Point, y: i32))
//!             .constructor(constructor!(Point => Point::new, [i32, i32]))
//!             .default_constructor(Point::default)
//!     }
//! }
//!
//! let names: Vec<_> = flatrec::introspect(&Point::new(1, 2)).iter().map(|m| m.name).collect();
//! assert_eq!(names, ["x", "y"]);
//! ```

use crate::infer::parse_as;
use crate::types::*;

/// Types that can describe their own members and constructors
pub trait Reflect: Sized + 'static {
    fn describe() -> TypeDescriptor<Self>;
}

/// How strictly the fallback path matches an inferred value to a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignPolicy {
    /// Inferred type must equal the declared type
    #[default]
    Exact,
    /// On mismatch, re-parse the raw token as the declared type
    Reinfer,
}

/// Result of one member assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned,
    Coerced,
    Mismatch,
}

pub type Getter<T> = fn(&T) -> MemberValue;
pub type Setter<T> = fn(&mut T, &InferredValue, AssignPolicy) -> AssignOutcome;

/// One externally visible member of `T`
pub struct MemberDescriptor<T> {
    pub name: &'static str,
    pub kind: MemberKind,
    pub declared: TypeTag,
    getter: Option<Getter<T>>,
    setter: Option<Setter<T>>,
}

impl<T> MemberDescriptor<T> {
    pub fn new(name: &'static str, kind: MemberKind, declared: TypeTag) -> Self {
        Self {
            name,
            kind,
            declared,
            getter: None,
            setter: None,
        }
    }

    pub fn with_getter(mut self, getter: Getter<T>) -> Self {
        self.getter = Some(getter);
        self
    }

    pub fn with_setter(mut self, setter: Setter<T>) -> Self {
        self.setter = Some(setter);
        self
    }

    pub fn readable(&self) -> bool {
        self.getter.is_some()
    }

    pub fn writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Current value, or `None` for a write-only member
    pub fn read(&self, owner: &T) -> Option<MemberValue> {
        self.getter.map(|get| get(owner))
    }

    /// Assign an inferred value; `None` for a read-only member
    pub fn write(&self, owner: &mut T, value: &InferredValue, policy: AssignPolicy) -> Option<AssignOutcome> {
        self.setter.map(|set| set(owner, value, policy))
    }
}

impl<T> std::fmt::Debug for MemberDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("declared", &self.declared)
            .field("readable", &self.readable())
            .field("writable", &self.writable())
            .finish()
    }
}

/// Typed constructor registered by `T`
pub struct Constructor<T> {
    pub signature: Vec<ScalarType>,
    build: fn(&[Scalar]) -> Option<T>,
}

impl<T> Constructor<T> {
    pub fn new(signature: Vec<ScalarType>, build: fn(&[Scalar]) -> Option<T>) -> Self {
        Self { signature, build }
    }

    pub fn matches(&self, signature: &[ScalarType]) -> bool {
        self.signature == signature
    }

    pub fn invoke(&self, args: &[Scalar]) -> Option<T> {
        (self.build)(args)
    }
}

/// Everything the serializer knows about `T`
pub struct TypeDescriptor<T> {
    pub type_name: &'static str,
    fields: Vec<MemberDescriptor<T>>,
    properties: Vec<MemberDescriptor<T>>,
    constructors: Vec<Constructor<T>>,
    default_ctor: Option<fn() -> T>,
}

impl<T> TypeDescriptor<T> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
            properties: Vec::new(),
            constructors: Vec::new(),
            default_ctor: None,
        }
    }

    pub fn member(mut self, member: MemberDescriptor<T>) -> Self {
        match member.kind {
            MemberKind::Field => self.fields.push(member),
            MemberKind::Property => self.properties.push(member),
        }
        self
    }

    pub fn constructor(mut self, ctor: Constructor<T>) -> Self {
        self.constructors.push(ctor);
        self
    }

    pub fn default_constructor(mut self, ctor: fn() -> T) -> Self {
        self.default_ctor = Some(ctor);
        self
    }

    /// Fields first, then properties
    pub fn members(&self) -> impl Iterator<Item = &MemberDescriptor<T>> {
        self.fields.iter().chain(self.properties.iter())
    }

    pub fn into_members(self) -> Vec<MemberDescriptor<T>> {
        let mut members = self.fields;
        members.extend(self.properties);
        members
    }

    pub fn field(&self, name: &str) -> Option<&MemberDescriptor<T>> {
        self.fields.iter().find(|m| m.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&MemberDescriptor<T>> {
        self.properties.iter().find(|m| m.name == name)
    }

    pub fn find_constructor(&self, signature: &[ScalarType]) -> Option<&Constructor<T>> {
        self.constructors.iter().find(|c| c.matches(signature))
    }

    pub fn default_ctor(&self) -> Option<fn() -> T> {
        self.default_ctor
    }
}

/// Enumerate the members of an object's type, fields before properties
pub fn introspect<T: Reflect>(_obj: &T) -> Vec<MemberDescriptor<T>> {
    T::describe().into_members()
}

// ============================================================
// Member value conversions
// ============================================================

/// Rust types usable as members
pub trait Member {
    fn type_tag() -> TypeTag;

    fn to_member(&self) -> MemberValue;

    /// Accept an inferred scalar of exactly this type
    fn from_scalar(_value: &Scalar) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }

    /// Parse raw token text as this type
    fn parse_raw(_raw: &str) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

/// Members usable as constructor arguments
pub trait ScalarArg: Member {
    const SCALAR_TYPE: ScalarType;
}

macro_rules! scalar_member {
    ($ty:ty, $variant:ident) => {
        impl Member for $ty {
            fn type_tag() -> TypeTag {
                TypeTag::Scalar(ScalarType::$variant)
            }

            fn to_member(&self) -> MemberValue {
                MemberValue::Scalar(Scalar::$variant(self.clone()))
            }

            fn from_scalar(value: &Scalar) -> Option<Self> {
                match value {
                    Scalar::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }

            fn parse_raw(raw: &str) -> Option<Self> {
                match parse_as(raw, ScalarType::$variant)? {
                    Scalar::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl ScalarArg for $ty {
            const SCALAR_TYPE: ScalarType = ScalarType::$variant;
        }
    };
}

scalar_member!(i32, Int);
scalar_member!(f32, Float);
scalar_member!(f64, Double);
scalar_member!(char, Char);
scalar_member!(String, Str);

impl<M: Member> Member for Option<M> {
    fn type_tag() -> TypeTag {
        TypeTag::Optional(Box::new(M::type_tag()))
    }

    fn to_member(&self) -> MemberValue {
        match self {
            Some(v) => v.to_member(),
            None => MemberValue::Null,
        }
    }

    fn from_scalar(value: &Scalar) -> Option<Self> {
        M::from_scalar(value).map(Some)
    }

    fn parse_raw(raw: &str) -> Option<Self> {
        M::parse_raw(raw).map(Some)
    }
}

impl<M: Member> Member for Vec<M> {
    fn type_tag() -> TypeTag {
        TypeTag::Sequence(Box::new(M::type_tag()))
    }

    fn to_member(&self) -> MemberValue {
        MemberValue::Seq(self.iter().map(Member::to_member).collect())
    }
}

impl<M: Member, const N: usize> Member for [M; N] {
    fn type_tag() -> TypeTag {
        TypeTag::Sequence(Box::new(M::type_tag()))
    }

    fn to_member(&self) -> MemberValue {
        MemberValue::Seq(self.iter().map(Member::to_member).collect())
    }
}

/// Convert `value` to `M` under `policy` and hand it to `apply`
pub fn assign_to<M, F>(value: &InferredValue, policy: AssignPolicy, apply: F) -> AssignOutcome
where
    M: Member,
    F: FnOnce(M),
{
    if let Some(converted) = M::from_scalar(&value.value) {
        apply(converted);
        return AssignOutcome::Assigned;
    }
    if policy == AssignPolicy::Reinfer {
        if let Some(converted) = M::parse_raw(&value.raw) {
            apply(converted);
            return AssignOutcome::Coerced;
        }
    }
    AssignOutcome::Mismatch
}

// ============================================================
// Registration macros
// ============================================================

/// Describe a public field: `field!(Owner, name: Type)`
#[macro_export]
macro_rules! field {
    ($owner:ty, $name:ident : $fty:ty) => {
        $crate::MemberDescriptor::<$owner>::new(
            stringify!($name),
            $crate::MemberKind::Field,
            <$fty as $crate::Member>::type_tag(),
        )
        .with_getter(|owner: &$owner| $crate::Member::to_member(&owner.$name))
        .with_setter(
            |owner: &mut $owner, value: &$crate::InferredValue, policy: $crate::AssignPolicy| {
                $crate::assign_to::<$fty, _>(value, policy, |converted| owner.$name = converted)
            },
        )
    };
}

/// Describe a property backed by accessor functions:
/// `property!(Owner, name: Type, get = f)`, `..., get = f, set = g)` or
/// `..., set = g)` for a write-only property.
#[macro_export]
macro_rules! property {
    ($owner:ty, $name:ident : $pty:ty, get = $get:expr, set = $set:expr) => {
        $crate::property!($owner, $name: $pty, get = $get)
            .with_setter(
                |owner: &mut $owner, value: &$crate::InferredValue, policy: $crate::AssignPolicy| {
                    $crate::assign_to::<$pty, _>(value, policy, |converted| ($set)(owner, converted))
                },
            )
    };
    ($owner:ty, $name:ident : $pty:ty, get = $get:expr) => {
        $crate::MemberDescriptor::<$owner>::new(
            stringify!($name),
            $crate::MemberKind::Property,
            <$pty as $crate::Member>::type_tag(),
        )
        .with_getter(|owner: &$owner| {
            let current: $pty = ($get)(owner);
            $crate::Member::to_member(&current)
        })
    };
    ($owner:ty, $name:ident : $pty:ty, set = $set:expr) => {
        $crate::MemberDescriptor::<$owner>::new(
            stringify!($name),
            $crate::MemberKind::Property,
            <$pty as $crate::Member>::type_tag(),
        )
        .with_setter(
            |owner: &mut $owner, value: &$crate::InferredValue, policy: $crate::AssignPolicy| {
                $crate::assign_to::<$pty, _>(value, policy, |converted| ($set)(owner, converted))
            },
        )
    };
}

/// Register a typed constructor: `constructor!(Owner => path, [T1, T2])`
#[macro_export]
macro_rules! constructor {
    ($owner:ty => $build:path, [$($arg:ty),* $(,)?]) => {
        $crate::Constructor::<$owner>::new(
            vec![$(<$arg as $crate::ScalarArg>::SCALAR_TYPE),*],
            |args: &[$crate::Scalar]| -> Option<$owner> {
                #[allow(unused_mut, unused_variables)]
                let mut args = args.iter();
                Some($build($(<$arg as $crate::Member>::from_scalar(args.next()?)?),*))
            },
        )
    };
}
