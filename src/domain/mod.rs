//! Domain Layer
//!
//! This is the core of Berth - deployment concepts without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Objects that live for one run (RuntimeCapability)
//! - `value_objects/` - Immutable value types (DomainSet, AccessStrategy, ProxyVariant)
//! - `services/` - Pure services (template rendering, config diffing)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or spawns processes directly
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
