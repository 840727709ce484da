//! OWL 2 vocabulary as typed Rust values.
//!
//! Entities are identified by kind plus local name inside the ontology
//! namespace: two values with the same kind and name denote the same entity.
//! Every type here is a plain value (cloneable, hashable and totally ordered)
//! so axioms deduplicate by equality and render in a stable order.

use std::collections::BTreeSet;

/// Well-known IRIs used across the model and the serializers.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XML Schema datatypes namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
}

/// The four kinds of named entity the translation engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    /// `owl:Class`.
    Class,
    /// `owl:ObjectProperty`.
    ObjectProperty,
    /// `owl:DatatypeProperty`.
    DataProperty,
    /// `owl:NamedIndividual`.
    NamedIndividual,
}

impl EntityKind {
    /// All kinds, in signature-report order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Class,
        EntityKind::ObjectProperty,
        EntityKind::DataProperty,
        EntityKind::NamedIndividual,
    ];

    /// Returns the OWL functional-syntax keyword for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Class => "Class",
            EntityKind::ObjectProperty => "ObjectProperty",
            EntityKind::DataProperty => "DataProperty",
            EntityKind::NamedIndividual => "NamedIndividual",
        }
    }

    /// Returns the local name of the `rdf:type` used to declare this kind.
    #[must_use]
    pub fn rdf_type(self) -> &'static str {
        match self {
            EntityKind::Class => "Class",
            EntityKind::ObjectProperty => "ObjectProperty",
            EntityKind::DataProperty => "DatatypeProperty",
            EntityKind::NamedIndividual => "NamedIndividual",
        }
    }
}

/// A named entity: kind plus normalized local name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    /// What sort of entity this is.
    pub kind: EntityKind,
    /// Local name inside the ontology namespace (already normalized).
    pub name: String,
}

impl Entity {
    /// Creates an entity of the given kind.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Creates a class entity.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Class, name)
    }

    /// Creates an object property entity.
    pub fn object_property(name: impl Into<String>) -> Self {
        Self::new(EntityKind::ObjectProperty, name)
    }

    /// Creates a data property entity.
    pub fn data_property(name: impl Into<String>) -> Self {
        Self::new(EntityKind::DataProperty, name)
    }

    /// Creates a named individual entity.
    pub fn individual(name: impl Into<String>) -> Self {
        Self::new(EntityKind::NamedIndividual, name)
    }
}

/// XML Schema datatypes used by data property ranges and literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Datatype {
    /// `xsd:boolean`.
    Boolean,
    /// `xsd:integer`.
    Integer,
    /// `xsd:nonNegativeInteger`, used for cardinality literals.
    NonNegativeInteger,
    /// `xsd:string`.
    String,
    /// `xsd:date`.
    Date,
    /// `xsd:anyURI`.
    AnyUri,
}

impl Datatype {
    /// Returns the local name inside the XSD namespace.
    #[must_use]
    pub fn local_name(self) -> &'static str {
        match self {
            Datatype::Boolean => "boolean",
            Datatype::Integer => "integer",
            Datatype::NonNegativeInteger => "nonNegativeInteger",
            Datatype::String => "string",
            Datatype::Date => "date",
            Datatype::AnyUri => "anyURI",
        }
    }

    /// Returns the full IRI of the datatype.
    #[must_use]
    pub fn iri(self) -> String {
        format!("{}{}", iris::XSD, self.local_name())
    }
}

/// How the lexical form of a [`Literal`] is qualified.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LiteralKind {
    /// A plain `xsd:string` literal.
    Plain,
    /// A language-tagged string.
    Lang(String),
    /// A typed literal.
    Typed(Datatype),
}

/// An RDF literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    /// Lexical form.
    pub lexical: String,
    /// Language tag or datatype.
    pub kind: LiteralKind,
}

impl Literal {
    /// A plain string literal.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            lexical: text.into(),
            kind: LiteralKind::Plain,
        }
    }

    /// An English language-tagged literal, used for labels and comments.
    pub fn en(text: impl Into<String>) -> Self {
        Self {
            lexical: text.into(),
            kind: LiteralKind::Lang("en".to_owned()),
        }
    }

    /// An `xsd:boolean` literal.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self {
            lexical: value.to_string(),
            kind: LiteralKind::Typed(Datatype::Boolean),
        }
    }

    /// An `xsd:integer` literal.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self {
            lexical: value.to_string(),
            kind: LiteralKind::Typed(Datatype::Integer),
        }
    }
}

/// A data range: the value space of a data property.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataRange {
    /// A named datatype.
    Datatype(Datatype),
    /// An enumeration of literals (`DataOneOf`).
    OneOf(BTreeSet<Literal>),
    /// A union of data ranges (`DataUnionOf`).
    UnionOf(BTreeSet<DataRange>),
    /// `xsd:integer` restricted by `minInclusive` / `maxInclusive` facets.
    IntegerInclusive {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

impl DataRange {
    /// Builds a `DataOneOf` over the given literals.
    pub fn one_of(values: impl IntoIterator<Item = Literal>) -> Self {
        DataRange::OneOf(values.into_iter().collect())
    }

    /// Builds a `DataUnionOf` over the given ranges.
    pub fn union_of(ranges: impl IntoIterator<Item = DataRange>) -> Self {
        DataRange::UnionOf(ranges.into_iter().collect())
    }
}

/// An OWL 2 class expression.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClassExpression {
    /// A named class.
    Class(String),
    /// `ObjectUnionOf`.
    UnionOf(BTreeSet<ClassExpression>),
    /// `ObjectIntersectionOf`.
    IntersectionOf(BTreeSet<ClassExpression>),
    /// `ObjectAllValuesFrom`.
    ObjectAllValuesFrom {
        /// Object property name.
        property: String,
        /// Filler expression.
        filler: Box<ClassExpression>,
    },
    /// `ObjectSomeValuesFrom`.
    ObjectSomeValuesFrom {
        /// Object property name.
        property: String,
        /// Filler expression.
        filler: Box<ClassExpression>,
    },
    /// Qualified `ObjectMaxCardinality`.
    ObjectMaxCardinality {
        /// Upper bound.
        cardinality: u32,
        /// Object property name.
        property: String,
        /// Qualifying class.
        filler: Box<ClassExpression>,
    },
    /// `DataSomeValuesFrom`.
    DataSomeValuesFrom {
        /// Data property name.
        property: String,
        /// Data range.
        range: DataRange,
    },
    /// `DataAllValuesFrom`.
    DataAllValuesFrom {
        /// Data property name.
        property: String,
        /// Data range.
        range: DataRange,
    },
    /// `DataHasValue`.
    DataHasValue {
        /// Data property name.
        property: String,
        /// Required value.
        value: Literal,
    },
    /// `DataExactCardinality`, optionally qualified by a data range.
    DataExactCardinality {
        /// Exact count.
        cardinality: u32,
        /// Data property name.
        property: String,
        /// Qualifying range, if any.
        range: Option<DataRange>,
    },
    /// Unqualified `DataMinCardinality`.
    DataMinCardinality {
        /// Lower bound.
        cardinality: u32,
        /// Data property name.
        property: String,
    },
    /// Unqualified `DataMaxCardinality`.
    DataMaxCardinality {
        /// Upper bound.
        cardinality: u32,
        /// Data property name.
        property: String,
    },
}

impl ClassExpression {
    /// A named class expression.
    pub fn named(name: impl Into<String>) -> Self {
        ClassExpression::Class(name.into())
    }

    /// An `ObjectUnionOf` over the given operands.
    pub fn union_of(operands: impl IntoIterator<Item = ClassExpression>) -> Self {
        ClassExpression::UnionOf(operands.into_iter().collect())
    }

    /// An `ObjectIntersectionOf` over the given operands.
    pub fn intersection_of(operands: impl IntoIterator<Item = ClassExpression>) -> Self {
        ClassExpression::IntersectionOf(operands.into_iter().collect())
    }

    /// The single operand when there is exactly one, a union otherwise.
    ///
    /// Returns `None` for an empty operand set.
    pub fn union_or_single(operands: impl IntoIterator<Item = ClassExpression>) -> Option<Self> {
        let mut set: BTreeSet<ClassExpression> = operands.into_iter().collect();
        match set.len() {
            0 => None,
            1 => set.pop_first(),
            _ => Some(ClassExpression::UnionOf(set)),
        }
    }

    /// Returns the class name when this is a named class.
    #[must_use]
    pub fn as_class(&self) -> Option<&str> {
        match self {
            ClassExpression::Class(name) => Some(name),
            _ => None,
        }
    }

    /// Collects every entity mentioned by this expression.
    pub fn collect_signature(&self, out: &mut Vec<Entity>) {
        match self {
            ClassExpression::Class(name) => out.push(Entity::class(name.as_str())),
            ClassExpression::UnionOf(ops) | ClassExpression::IntersectionOf(ops) => {
                for op in ops {
                    op.collect_signature(out);
                }
            }
            ClassExpression::ObjectAllValuesFrom { property, filler }
            | ClassExpression::ObjectSomeValuesFrom { property, filler }
            | ClassExpression::ObjectMaxCardinality {
                property, filler, ..
            } => {
                out.push(Entity::object_property(property.as_str()));
                filler.collect_signature(out);
            }
            ClassExpression::DataSomeValuesFrom { property, .. }
            | ClassExpression::DataAllValuesFrom { property, .. }
            | ClassExpression::DataHasValue { property, .. }
            | ClassExpression::DataExactCardinality { property, .. }
            | ClassExpression::DataMinCardinality { property, .. }
            | ClassExpression::DataMaxCardinality { property, .. } => {
                out.push(Entity::data_property(property.as_str()));
            }
        }
    }
}

/// Annotation properties attached to entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnnotationProperty {
    /// `rdfs:label`.
    Label,
    /// `rdfs:comment`.
    Comment,
    /// `rdfs:seeAlso`.
    SeeAlso,
}

impl AnnotationProperty {
    /// Returns the prefixed name (`rdfs:label`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationProperty::Label => "rdfs:label",
            AnnotationProperty::Comment => "rdfs:comment",
            AnnotationProperty::SeeAlso => "rdfs:seeAlso",
        }
    }

    /// Returns the full IRI.
    #[must_use]
    pub fn iri(self) -> String {
        let local = match self {
            AnnotationProperty::Label => "label",
            AnnotationProperty::Comment => "comment",
            AnnotationProperty::SeeAlso => "seeAlso",
        };
        format!("{}{}", iris::RDFS, local)
    }
}

/// Object property characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectCharacteristic {
    /// `FunctionalObjectProperty`.
    Functional,
    /// `InverseFunctionalObjectProperty`.
    InverseFunctional,
    /// `TransitiveObjectProperty`.
    Transitive,
    /// `SymmetricObjectProperty`.
    Symmetric,
    /// `AsymmetricObjectProperty`.
    Asymmetric,
    /// `ReflexiveObjectProperty`.
    Reflexive,
    /// `IrreflexiveObjectProperty`.
    Irreflexive,
}

impl ObjectCharacteristic {
    /// Returns the functional-syntax axiom keyword.
    #[must_use]
    pub fn axiom_name(self) -> &'static str {
        match self {
            ObjectCharacteristic::Functional => "FunctionalObjectProperty",
            ObjectCharacteristic::InverseFunctional => "InverseFunctionalObjectProperty",
            ObjectCharacteristic::Transitive => "TransitiveObjectProperty",
            ObjectCharacteristic::Symmetric => "SymmetricObjectProperty",
            ObjectCharacteristic::Asymmetric => "AsymmetricObjectProperty",
            ObjectCharacteristic::Reflexive => "ReflexiveObjectProperty",
            ObjectCharacteristic::Irreflexive => "IrreflexiveObjectProperty",
        }
    }

    /// Returns the local name of the OWL class used as `rdf:type`.
    #[must_use]
    pub fn rdf_type(self) -> &'static str {
        match self {
            ObjectCharacteristic::Functional => "FunctionalProperty",
            ObjectCharacteristic::InverseFunctional => "InverseFunctionalProperty",
            ObjectCharacteristic::Transitive => "TransitiveProperty",
            ObjectCharacteristic::Symmetric => "SymmetricProperty",
            ObjectCharacteristic::Asymmetric => "AsymmetricProperty",
            ObjectCharacteristic::Reflexive => "ReflexiveProperty",
            ObjectCharacteristic::Irreflexive => "IrreflexiveProperty",
        }
    }
}

/// A single OWL 2 axiom.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axiom {
    /// Entity declaration.
    Declaration(Entity),
    /// Annotation assertion on an entity IRI.
    AnnotationAssertion {
        /// Annotated entity.
        subject: Entity,
        /// Annotation property.
        property: AnnotationProperty,
        /// Annotation value.
        value: Literal,
    },
    /// `SubClassOf(sub, sup)`.
    SubClassOf {
        /// Subclass expression.
        sub: ClassExpression,
        /// Superclass expression.
        sup: ClassExpression,
    },
    /// N-ary `EquivalentClasses`.
    EquivalentClasses(BTreeSet<ClassExpression>),
    /// N-ary `DisjointClasses`.
    DisjointClasses(BTreeSet<ClassExpression>),
    /// N-ary `EquivalentObjectProperties`.
    EquivalentObjectProperties(BTreeSet<String>),
    /// N-ary `EquivalentDataProperties`.
    EquivalentDataProperties(BTreeSet<String>),
    /// N-ary `SameIndividual`.
    SameIndividual(BTreeSet<String>),
    /// `ObjectPropertyDomain`.
    ObjectPropertyDomain {
        /// Object property name.
        property: String,
        /// Domain expression.
        domain: ClassExpression,
    },
    /// `ObjectPropertyRange`.
    ObjectPropertyRange {
        /// Object property name.
        property: String,
        /// Range expression.
        range: ClassExpression,
    },
    /// `DataPropertyDomain`.
    DataPropertyDomain {
        /// Data property name.
        property: String,
        /// Domain expression.
        domain: ClassExpression,
    },
    /// `DataPropertyRange`.
    DataPropertyRange {
        /// Data property name.
        property: String,
        /// Range.
        range: DataRange,
    },
    /// `InverseObjectProperties(first, second)`.
    InverseObjectProperties(String, String),
    /// `SubObjectPropertyOf(sub, sup)`.
    SubObjectPropertyOf {
        /// Sub-property name.
        sub: String,
        /// Super-property name.
        sup: String,
    },
    /// A characteristic axiom on an object property.
    ObjectPropertyCharacteristic {
        /// Object property name.
        property: String,
        /// The characteristic asserted.
        characteristic: ObjectCharacteristic,
    },
    /// `ClassAssertion(class, individual)`.
    ClassAssertion {
        /// Asserted class.
        class: ClassExpression,
        /// Individual name.
        individual: String,
    },
    /// `ObjectPropertyAssertion(property, subject, object)`.
    ObjectPropertyAssertion {
        /// Object property name.
        property: String,
        /// Subject individual name.
        subject: String,
        /// Object individual name.
        object: String,
    },
    /// `DataPropertyAssertion(property, subject, value)`.
    DataPropertyAssertion {
        /// Data property name.
        property: String,
        /// Subject individual name.
        subject: String,
        /// Asserted value.
        value: Literal,
    },
}

impl Axiom {
    /// Returns every entity this axiom puts into the ontology signature.
    ///
    /// Annotation assertions annotate an IRI and contribute nothing, so a
    /// label on an otherwise unused name does not make it part of the
    /// signature.
    #[must_use]
    pub fn signature(&self) -> Vec<Entity> {
        let mut out = Vec::new();
        match self {
            Axiom::Declaration(entity) => out.push(entity.clone()),
            Axiom::AnnotationAssertion { .. } => {}
            Axiom::SubClassOf { sub, sup } => {
                sub.collect_signature(&mut out);
                sup.collect_signature(&mut out);
            }
            Axiom::EquivalentClasses(set) | Axiom::DisjointClasses(set) => {
                for ce in set {
                    ce.collect_signature(&mut out);
                }
            }
            Axiom::EquivalentObjectProperties(names) => {
                out.extend(names.iter().map(|n| Entity::object_property(n.as_str())));
            }
            Axiom::EquivalentDataProperties(names) => {
                out.extend(names.iter().map(|n| Entity::data_property(n.as_str())));
            }
            Axiom::SameIndividual(names) => {
                out.extend(names.iter().map(|n| Entity::individual(n.as_str())));
            }
            Axiom::ObjectPropertyDomain { property, domain: ce }
            | Axiom::ObjectPropertyRange { property, range: ce } => {
                out.push(Entity::object_property(property.as_str()));
                ce.collect_signature(&mut out);
            }
            Axiom::DataPropertyDomain { property, domain } => {
                out.push(Entity::data_property(property.as_str()));
                domain.collect_signature(&mut out);
            }
            Axiom::DataPropertyRange { property, .. } => {
                out.push(Entity::data_property(property.as_str()));
            }
            Axiom::InverseObjectProperties(first, second) => {
                out.push(Entity::object_property(first.as_str()));
                out.push(Entity::object_property(second.as_str()));
            }
            Axiom::SubObjectPropertyOf { sub, sup } => {
                out.push(Entity::object_property(sub.as_str()));
                out.push(Entity::object_property(sup.as_str()));
            }
            Axiom::ObjectPropertyCharacteristic { property, .. } => {
                out.push(Entity::object_property(property.as_str()));
            }
            Axiom::ClassAssertion { class, individual } => {
                class.collect_signature(&mut out);
                out.push(Entity::individual(individual.as_str()));
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => {
                out.push(Entity::object_property(property.as_str()));
                out.push(Entity::individual(subject.as_str()));
                out.push(Entity::individual(object.as_str()));
            }
            Axiom::DataPropertyAssertion {
                property, subject, ..
            } => {
                out.push(Entity::data_property(property.as_str()));
                out.push(Entity::individual(subject.as_str()));
            }
        }
        out
    }

    /// Short name of the axiom type, used in summaries and logs.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Axiom::Declaration(_) => "Declaration",
            Axiom::AnnotationAssertion { .. } => "AnnotationAssertion",
            Axiom::SubClassOf { .. } => "SubClassOf",
            Axiom::EquivalentClasses(_) => "EquivalentClasses",
            Axiom::DisjointClasses(_) => "DisjointClasses",
            Axiom::EquivalentObjectProperties(_) => "EquivalentObjectProperties",
            Axiom::EquivalentDataProperties(_) => "EquivalentDataProperties",
            Axiom::SameIndividual(_) => "SameIndividual",
            Axiom::ObjectPropertyDomain { .. } => "ObjectPropertyDomain",
            Axiom::ObjectPropertyRange { .. } => "ObjectPropertyRange",
            Axiom::DataPropertyDomain { .. } => "DataPropertyDomain",
            Axiom::DataPropertyRange { .. } => "DataPropertyRange",
            Axiom::InverseObjectProperties(..) => "InverseObjectProperties",
            Axiom::SubObjectPropertyOf { .. } => "SubObjectPropertyOf",
            Axiom::ObjectPropertyCharacteristic { characteristic, .. } => {
                characteristic.axiom_name()
            }
            Axiom::ClassAssertion { .. } => "ClassAssertion",
            Axiom::ObjectPropertyAssertion { .. } => "ObjectPropertyAssertion",
            Axiom::DataPropertyAssertion { .. } => "DataPropertyAssertion",
        }
    }
}

/// Ontology-level identity and annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyHeader {
    /// Ontology IRI (e.g. `http://localhost/LUO_-_OntoLing`).
    pub iri: String,
    /// Version IRI (`<iri>/<version>`).
    pub version_iri: String,
    /// `rdfs:label` of the ontology.
    pub label: String,
    /// `owl:versionInfo` of the ontology.
    pub version_info: String,
}

impl OntologyHeader {
    /// Builds a header from a base URL, a human-readable name and a version stamp.
    ///
    /// Spaces in the name become `_` in the IRI.
    #[must_use]
    pub fn new(base_url: &str, name: &str, version: &str) -> Self {
        let iri = format!("{}{}", base_url, name.replace(' ', "_"));
        Self {
            version_iri: format!("{}/{}", iri, version),
            iri,
            label: name.to_owned(),
            version_info: version.to_owned(),
        }
    }

    /// Namespace every entity name is resolved against (`<iri>#`).
    #[must_use]
    pub fn namespace(&self) -> String {
        format!("{}#", self.iri)
    }

    /// Full IRI of a local entity name.
    #[must_use]
    pub fn entity_iri(&self, name: &str) -> String {
        format!("{}#{}", self.iri, encode_iri_local(name))
    }
}

/// Percent-encodes the characters that may not appear in an IRI.
#[must_use]
pub fn encode_iri_local(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            ' ' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '#' | '%' => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", b));
                }
            }
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", b));
                }
            }
            c => out.push(c),
        }
    }
    out
}
