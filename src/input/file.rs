pub mod gedcom;
pub mod xml;
