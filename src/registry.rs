use crate::{EnumError, Ordinal, Result, Scalar};
use core::fmt;
use core::hash::{Hash, Hasher};
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of one declared enumeration. Unique per call to [`EnumType::declare`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EnumTypeId(u64);

/// Handle to a declared enumeration: its fixed constant list and the cache of
/// its canonical instances. Clones share the same descriptor.
///
/// Ordinals are dense: the n-th declared constant has ordinal n.
#[derive(Clone)]
pub struct EnumType {
    desc: Arc<TypeDescriptor>,
}

struct TypeDescriptor {
    id: EnumTypeId,
    name: Arc<str>,
    // invariant: both maps hold the constants in declaration order, so
    // an entry's index in either map is its ordinal
    by_name: IndexMap<Arc<str>, Scalar>,
    by_value: IndexMap<Scalar, Arc<str>>,
    // invariant: instances.len() == by_name.len(); slot i is filled at most once
    instances: Box<[OnceLock<EnumValue>]>,
}

/// The canonical instance of one declared constant.
///
/// At most one instance exists per (type, ordinal): equality is identity, and
/// cloning hands out another reference to the same instance.
#[derive(Clone)]
pub struct EnumValue(Arc<ValueInner>);

struct ValueInner {
    ordinal: Ordinal,
    name: Arc<str>,
    value: Scalar,
    type_id: EnumTypeId,
    type_name: Arc<str>,
}

/// Anything that can be resolved into a canonical instance of a given type:
/// instances of that type, or raw scalars it declares.
pub trait IntoEnumValue {
    fn into_enum_value(self, ty: &EnumType) -> Result<EnumValue>;
}

/// Registered enumerations by name. Names are matched ASCII case-insensitively.
#[derive(Default, Clone)]
pub struct EnumCatalog {
    types: IndexMap<String, EnumType>,
}

///////////////////////////////////////////////////////////////////////

impl EnumType {
    /// Declares a new enumeration from its constants, in order.
    ///
    /// Fails if a constant name repeats, or if two constants share a raw value
    /// (there could be no single instance for that value).
    pub fn declare<I, N, V>(name: &str, constants: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<Scalar>,
    {
        let type_name: Arc<str> = name.into();
        let mut by_name = IndexMap::new();
        let mut by_value = IndexMap::new();
        for (const_name, raw) in constants {
            let const_name: Arc<str> = const_name.as_ref().into();
            let raw = raw.into();
            match by_value.entry(raw.clone()) {
                Entry::Occupied(e) => {
                    return Err(EnumError::AmbiguousValue {
                        ty: type_name,
                        value: raw,
                        first: Arc::clone(e.get()),
                        second: const_name,
                    })
                }
                Entry::Vacant(e) => {
                    e.insert(Arc::clone(&const_name));
                }
            }
            if by_name.insert(Arc::clone(&const_name), raw).is_some() {
                return Err(EnumError::DuplicateName { ty: type_name, name: const_name.to_string() });
            }
        }
        let id = EnumTypeId(NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(enumeration = %type_name, id = id.0, constants = by_name.len(), "declared enumeration");
        let instances = (0..by_name.len()).map(|_| OnceLock::new()).collect();
        Ok(Self { desc: Arc::new(TypeDescriptor { id, name: type_name, by_name, by_value, instances }) })
    }
    pub fn id(&self) -> EnumTypeId {
        self.desc.id
    }
    pub fn name(&self) -> &str {
        &self.desc.name
    }
    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.desc.name)
    }
    /// The fixed constant list: name -> raw value, in ordinal order.
    pub fn declared_values(&self) -> &IndexMap<Arc<str>, Scalar> {
        &self.desc.by_name
    }
    /// Number of declared constants; ordinals range over `0..ordinal_count()`.
    pub fn ordinal_count(&self) -> usize {
        self.desc.by_name.len()
    }
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.desc.by_name.keys().map(|k| &**k)
    }
    /// Resolves an instance or raw value into this type's canonical instance.
    ///
    /// Instances of this type come back unchanged. Instances of any other type
    /// are rejected with [`EnumError::TypeMismatch`], even if that type has
    /// the same name and constants.
    pub fn canonical_instance<V: IntoEnumValue>(&self, v: V) -> Result<EnumValue> {
        v.into_enum_value(self)
    }
    /// Shorthand for [`EnumType::canonical_instance`] on a raw value.
    pub fn get<V: Into<Scalar>>(&self, raw: V) -> Result<EnumValue> {
        self.by_value(&raw.into())
    }
    pub fn by_value(&self, raw: &Scalar) -> Result<EnumValue> {
        match self.desc.by_value.get_index_of(raw) {
            Some(ordinal) => Ok(self.instance(ordinal)),
            None => Err(EnumError::InvalidValue { ty: self.shared_name(), value: raw.clone() }),
        }
    }
    pub fn by_name(&self, name: &str) -> Result<EnumValue> {
        match self.desc.by_name.get_index_of(name) {
            Some(ordinal) => Ok(self.instance(ordinal)),
            None => Err(EnumError::InvalidName { ty: self.shared_name(), name: name.to_owned() }),
        }
    }
    pub fn by_ordinal(&self, ordinal: Ordinal) -> Result<EnumValue> {
        if ordinal < self.ordinal_count() {
            Ok(self.instance(ordinal))
        } else {
            Err(EnumError::OrdinalOutOfRange {
                ty: self.shared_name(),
                ordinal,
                count: self.ordinal_count(),
            })
        }
    }
    /// All canonical instances in ordinal order, creating any not yet created.
    pub fn values(&self) -> Vec<EnumValue> {
        (0..self.ordinal_count()).map(|ordinal| self.instance(ordinal)).collect()
    }
    /// Fails with TypeMismatch unless `v` belongs to this type.
    pub(crate) fn check_owner(&self, v: &EnumValue) -> Result<()> {
        if v.enum_type_id() == self.id() {
            Ok(())
        } else {
            Err(EnumError::TypeMismatch { expected: self.shared_name(), found: Arc::clone(&v.0.type_name) })
        }
    }
    /// Fails with TypeMismatch unless `other` is this very type.
    pub(crate) fn check_same(&self, other: &EnumType) -> Result<()> {
        if self.id() == other.id() {
            Ok(())
        } else {
            Err(EnumError::TypeMismatch { expected: self.shared_name(), found: other.shared_name() })
        }
    }
    // ordinal must be in range
    fn instance(&self, ordinal: Ordinal) -> EnumValue {
        let desc = &*self.desc;
        desc.instances[ordinal].get_or_init(|| desc.create_instance(ordinal)).clone()
    }
}

impl TypeDescriptor {
    fn create_instance(&self, ordinal: Ordinal) -> EnumValue {
        let Some((name, value)) = self.by_name.get_index(ordinal) else {
            unreachable!("ordinal {ordinal} out of range for '{}'", self.name)
        };
        tracing::trace!(enumeration = %self.name, constant = %name, ordinal, "created instance");
        EnumValue(Arc::new(ValueInner {
            ordinal,
            name: Arc::clone(name),
            value: value.clone(),
            type_id: self.id,
            type_name: Arc::clone(&self.name),
        }))
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
impl Eq for EnumType {}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType").field("name", &self.name()).field("constants", self.declared_values()).finish()
    }
}

///////////////////////////////////////////////////////////////////////

impl EnumValue {
    pub fn ordinal(&self) -> Ordinal {
        self.0.ordinal
    }
    /// The constant's name.
    pub fn name(&self) -> &str {
        &self.0.name
    }
    /// The constant's raw value.
    pub fn value(&self) -> &Scalar {
        &self.0.value
    }
    pub fn enum_type_id(&self) -> EnumTypeId {
        self.0.type_id
    }
    pub fn type_name(&self) -> &str {
        &self.0.type_name
    }
    /// Whether this constant was declared with the raw value `raw`.
    /// Comparison is strict: `Int(1)` does not match `Float(1.0)`.
    pub fn is<V: Into<Scalar>>(&self, raw: V) -> bool {
        *self.value() == raw.into()
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for EnumValue {}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.type_id.hash(state);
        self.0.ordinal.hash(state);
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}({})", self.type_name(), self.name(), self.value())
    }
}

///////////////////////////////////////////////////////////////////////

impl IntoEnumValue for EnumValue {
    fn into_enum_value(self, ty: &EnumType) -> Result<EnumValue> {
        ty.check_owner(&self)?;
        Ok(self)
    }
}
impl IntoEnumValue for &EnumValue {
    fn into_enum_value(self, ty: &EnumType) -> Result<EnumValue> {
        ty.check_owner(self)?;
        Ok(self.clone())
    }
}
impl IntoEnumValue for Scalar {
    fn into_enum_value(self, ty: &EnumType) -> Result<EnumValue> {
        ty.by_value(&self)
    }
}
impl IntoEnumValue for &Scalar {
    fn into_enum_value(self, ty: &EnumType) -> Result<EnumValue> {
        ty.by_value(self)
    }
}
macro_rules! into_enum_value_via_scalar {
    ($($t:ty),*) => {
        $(impl IntoEnumValue for $t {
            fn into_enum_value(self, ty: &EnumType) -> Result<EnumValue> {
                ty.by_value(&Scalar::from(self))
            }
        })*
    };
}
into_enum_value_via_scalar!(bool, i32, u32, i64, f64, &str, String);

///////////////////////////////////////////////////////////////////////

impl EnumCatalog {
    pub fn new() -> Self {
        Self::default()
    }
    /// Registers `ty` under its name, returning any type previously registered
    /// under the same name.
    pub fn register(&mut self, ty: EnumType) -> Option<EnumType> {
        tracing::debug!(enumeration = %ty.name(), "registered enumeration");
        self.types.insert(ty.name().to_ascii_lowercase(), ty)
    }
    /// Declares and registers in one step.
    pub fn declare<I, N, V>(&mut self, name: &str, constants: I) -> Result<EnumType>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<Scalar>,
    {
        let ty = EnumType::declare(name, constants)?;
        self.register(ty.clone());
        Ok(ty)
    }
    /// Looks up a registered enumeration. Names that are not registered
    /// enumerations fail with [`EnumError::UnsupportedType`].
    pub fn get(&self, name: &str) -> Result<EnumType> {
        self.types
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| EnumError::UnsupportedType { name: name.to_owned() })
    }
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(&name.to_ascii_lowercase())
    }
    pub fn len(&self) -> usize {
        self.types.len()
    }
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &EnumType> + '_ {
        self.types.values()
    }
}
