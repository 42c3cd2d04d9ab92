pub mod collect;
pub mod decrypt;
pub mod keygen;
pub mod sections;
pub mod show;
