// Field validation: the predicate library and the reference tables it reads

pub mod predicates;
pub mod reference;

pub use predicates::*;
pub use reference::ReferenceTables;
