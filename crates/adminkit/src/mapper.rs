//! # Projections
//!
//! Declarative object-to-object mapping: a domain entity (or a stored record) is
//! projected into an API/view shape by rules registered once at startup.
//!
//! ## Lifecycle
//!
//! 1. Each [`MapperProfile`] registers its type maps into a
//!    [`MapperConfiguration`]. [`MapperConfiguration::from_profiles`] invokes every
//!    profile's `register_mappings` exactly once.
//! 2. The configuration is validated immediately. A rule naming a member that the
//!    declared shapes do not have, or a destination member nobody fills, fails
//!    construction, so broken mappings block startup instead of surfacing at
//!    first use.
//! 3. [`MapperConfiguration::create_mapper`] validates again and compiles the maps
//!    into a [`Mapper`]: stateless, cheap to clone and safe to share across
//!    threads. Maps added after `from_profiles` are checked here, so no mapper is
//!    ever compiled from unchecked rules.
//!
//! ## Member Resolution
//!
//! For every destination member, in declaration order:
//!
//! | Rule | Result |
//! |------|--------|
//! | `map_from(dest, src)` | value of `src` |
//! | `convert(dest, src, f)` | `f(value of src)` |
//! | `constant(dest, v)` | `v` |
//! | `ignore(dest)` | member omitted |
//! | none | value of the same-named source member |
//!
//! Source members missing from a given object read as `null`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::schema::ModelSchema;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("map {source_shape} -> {destination}: unknown source member '{member}'")]
    UnknownSourceMember {
        source_shape: String,
        destination: String,
        member: String,
    },

    #[error("map {source_shape} -> {destination}: unknown destination member '{member}'")]
    UnknownDestinationMember {
        source_shape: String,
        destination: String,
        member: String,
    },

    #[error("map {source_shape} -> {destination}: destination member '{member}' is not mapped")]
    UnmappedDestinationMember {
        source_shape: String,
        destination: String,
        member: String,
    },

    #[error("map {source_shape} -> {destination} is registered more than once")]
    DuplicateTypeMap {
        source_shape: String,
        destination: String,
    },

    #[error("no map registered for {source_shape} -> {destination}")]
    MissingTypeMap {
        source_shape: String,
        destination: String,
    },

    #[error("cannot map {source_shape}: expected an object, got {found}")]
    NotAnObject { source_shape: String, found: String },

    #[error("projection serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The member list of a source or destination type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    name: String,
    members: Vec<String>,
}

impl Shape {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// A shape whose members are the schema's field names.
    pub fn from_schema(schema: &ModelSchema) -> Self {
        Self::new(schema.name(), schema.fields().iter().map(|f| f.name.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn has(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }
}

type Converter = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

#[derive(Clone)]
enum MemberRule {
    From(String),
    Convert { source: String, convert: Converter },
    Constant(Value),
    Ignore,
}

impl MemberRule {
    fn source_member(&self) -> Option<&str> {
        match self {
            MemberRule::From(src) | MemberRule::Convert { source: src, .. } => Some(src),
            MemberRule::Constant(_) | MemberRule::Ignore => None,
        }
    }
}

impl fmt::Debug for MemberRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRule::From(src) => write!(f, "From({})", src),
            MemberRule::Convert { source, .. } => write!(f, "Convert({})", source),
            MemberRule::Constant(v) => write!(f, "Constant({})", v),
            MemberRule::Ignore => f.write_str("Ignore"),
        }
    }
}

/// Rules for one source → destination pair.
#[derive(Debug, Clone)]
pub struct TypeMap {
    source: Shape,
    destination: Shape,
    rules: Vec<(String, MemberRule)>,
}

impl TypeMap {
    fn rule(&mut self, dest: impl Into<String>, rule: MemberRule) -> &mut Self {
        let dest = dest.into();
        self.rules.retain(|(d, _)| *d != dest);
        self.rules.push((dest, rule));
        self
    }

    /// Fills `dest` from the source member `src`.
    pub fn map_from(&mut self, dest: impl Into<String>, src: impl Into<String>) -> &mut Self {
        self.rule(dest, MemberRule::From(src.into()))
    }

    /// Fills `dest` by applying `convert` to the source member `src`.
    pub fn convert<F>(&mut self, dest: impl Into<String>, src: impl Into<String>, convert: F) -> &mut Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.rule(
            dest,
            MemberRule::Convert {
                source: src.into(),
                convert: Arc::new(convert),
            },
        )
    }

    pub fn constant(&mut self, dest: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.rule(dest, MemberRule::Constant(value.into()))
    }

    /// Leaves `dest` out of the projection.
    pub fn ignore(&mut self, dest: impl Into<String>) -> &mut Self {
        self.rule(dest, MemberRule::Ignore)
    }

    fn key(&self) -> (String, String) {
        (self.source.name.clone(), self.destination.name.clone())
    }

    fn validate(&self) -> Result<(), MappingError> {
        let err_ctx = || (self.source.name.clone(), self.destination.name.clone());

        for (dest, rule) in &self.rules {
            if !self.destination.has(dest) {
                let (source_shape, destination) = err_ctx();
                return Err(MappingError::UnknownDestinationMember {
                    source_shape,
                    destination,
                    member: dest.clone(),
                });
            }
            if let Some(src) = rule.source_member() {
                if !self.source.has(src) {
                    let (source_shape, destination) = err_ctx();
                    return Err(MappingError::UnknownSourceMember {
                        source_shape,
                        destination,
                        member: src.to_string(),
                    });
                }
            }
        }

        for member in self.destination.members() {
            let explicit = self.rules.iter().any(|(d, _)| d == member);
            if !explicit && !self.source.has(member) {
                let (source_shape, destination) = err_ctx();
                return Err(MappingError::UnmappedDestinationMember {
                    source_shape,
                    destination,
                    member: member.clone(),
                });
            }
        }
        Ok(())
    }

    /// Resolves every destination member to a concrete rule, in destination order.
    fn compile(&self) -> Vec<(String, MemberRule)> {
        self.destination
            .members()
            .iter()
            .map(|member| {
                let rule = self
                    .rules
                    .iter()
                    .find(|(d, _)| d == member)
                    .map(|(_, r)| r.clone())
                    .unwrap_or_else(|| MemberRule::From(member.clone()));
                (member.clone(), rule)
            })
            .collect()
    }
}

/// A set of mapping rules registered together.
pub trait MapperProfile {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn register_mappings(&self, cfg: &mut MapperConfiguration);
}

/// Validated mapping rules, built once at startup.
#[derive(Debug, Default)]
pub struct MapperConfiguration {
    maps: Vec<TypeMap>,
}

impl MapperConfiguration {
    /// Runs every profile's registration once and validates the result.
    pub fn from_profiles(profiles: &[&dyn MapperProfile]) -> Result<Self, MappingError> {
        let mut cfg = Self::default();
        for profile in profiles {
            debug!(profile = profile.name(), "registering mappings");
            profile.register_mappings(&mut cfg);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Starts a type map. Unmentioned destination members map by name.
    pub fn create_map(&mut self, source: Shape, destination: Shape) -> &mut TypeMap {
        self.maps.push(TypeMap {
            source,
            destination,
            rules: Vec::new(),
        });
        // Just pushed, so the vector is non-empty.
        let last = self.maps.len() - 1;
        &mut self.maps[last]
    }

    pub fn type_maps(&self) -> impl Iterator<Item = (&str, &str)> {
        self.maps
            .iter()
            .map(|m| (m.source.name(), m.destination.name()))
    }

    fn validate(&self) -> Result<(), MappingError> {
        let mut seen = HashSet::new();
        for map in &self.maps {
            if !seen.insert(map.key()) {
                let (source_shape, destination) = map.key();
                return Err(MappingError::DuplicateTypeMap {
                    source_shape,
                    destination,
                });
            }
            map.validate()?;
        }
        debug!(maps = self.maps.len(), "mapper configuration is valid");
        Ok(())
    }

    /// Validates and compiles the configuration into a shareable mapper.
    pub fn create_mapper(&self) -> Result<Mapper, MappingError> {
        self.validate()?;
        let plans = self
            .maps
            .iter()
            .map(|m| (m.key(), m.compile()))
            .collect::<HashMap<_, _>>();
        Ok(Mapper {
            plans: Arc::new(plans),
        })
    }
}

/// Stateless projector produced by [`MapperConfiguration::create_mapper`].
#[derive(Clone, Debug, Default)]
pub struct Mapper {
    plans: Arc<HashMap<(String, String), Vec<(String, MemberRule)>>>,
}

impl Mapper {
    pub fn has_map(&self, source: &str, destination: &str) -> bool {
        self.plans
            .contains_key(&(source.to_string(), destination.to_string()))
    }

    /// Projects a JSON object from `source` shape into `destination` shape.
    pub fn map(&self, source: &str, destination: &str, value: &Value) -> Result<Value, MappingError> {
        let plan = self
            .plans
            .get(&(source.to_string(), destination.to_string()))
            .ok_or_else(|| MappingError::MissingTypeMap {
                source_shape: source.to_string(),
                destination: destination.to_string(),
            })?;

        let object = value.as_object().ok_or_else(|| MappingError::NotAnObject {
            source_shape: source.to_string(),
            found: json_type(value).to_string(),
        })?;

        let read = |member: &str| object.get(member).cloned().unwrap_or(Value::Null);

        let mut out = Map::with_capacity(plan.len());
        for (dest, rule) in plan {
            let value = match rule {
                MemberRule::From(src) => read(src),
                MemberRule::Convert { source, convert } => convert(&read(source)),
                MemberRule::Constant(v) => v.clone(),
                MemberRule::Ignore => continue,
            };
            out.insert(dest.clone(), value);
        }
        Ok(Value::Object(out))
    }

    /// Projects a typed value through its serde representation.
    pub fn map_into<S, D>(&self, source: &str, destination: &str, value: &S) -> Result<D, MappingError>
    where
        S: Serialize,
        D: DeserializeOwned,
    {
        let json = serde_json::to_value(value)?;
        let projected = self.map(source, destination, &json)?;
        Ok(serde_json::from_value(projected)?)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
