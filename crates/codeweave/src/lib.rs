//! Codeweave - live model and diagram graphs for code structure visualization.
//!
//! Codeweave keeps two coupled, immutable graphs consistent under incremental
//! mutation:
//!
//! - the [`model`]: entities of the analysed code and their typed
//!   relationships,
//! - the [`diagram`]: the subset of the model currently shown, nested into
//!   containers and laid out in 2-D.
//!
//! Mutations go through the [`engine`], which serializes writers, derives
//! container sizes and absolute positions, and publishes one ordered list of
//! events per committed session. The [`expansion`] module grows both graphs
//! from a seed node through a pluggable [`features::RelationshipDiscovery`],
//! and the [`layout`] module composes nested relative layouts into canvas
//! coordinates.
//!
//! # Examples
//!
//! ```
//! use codeweave::{config::AppConfig, engine::ModelStore};
//! use codeweave::identifier::{EntityRef, Name};
//! use codeweave::stereotype::{NodeStereotype, Origin, RelationshipStereotype};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = ModelStore::new(AppConfig::default());
//! let mut session = store.begin().await;
//! let shape = session.get_or_add_model_node(
//!     Name::new("Shape"),
//!     NodeStereotype::Interface,
//!     Origin::Source,
//!     EntityRef::from("T:Shape"),
//! );
//! let circle = session.get_or_add_model_node(
//!     Name::new("Circle"),
//!     NodeStereotype::Class,
//!     Origin::Source,
//!     EntityRef::from("T:Circle"),
//! );
//! let implements = session
//!     .get_or_add_model_relationship(circle, shape, RelationshipStereotype::Implementation, None)?;
//! session.show_node(shape, None)?;
//! session.show_node(circle, None)?;
//! session.show_relationship(implements)?;
//! session.commit();
//!
//! let snapshot = store.snapshot();
//! assert!(snapshot.diagram().path_exists(circle, shape, RelationshipStereotype::Inheritance));
//! # Ok::<(), codeweave::CodeweaveError>(())
//! # }).unwrap();
//! ```

pub mod config;
pub mod diagram;
pub mod engine;
pub mod expansion;
pub mod features;
pub mod layout;
pub mod model;
pub mod structure;

mod error;

pub use codeweave_core::{connector, geometry, identifier, stereotype};

pub use error::{CodeweaveError, ElementKind};
