//! Typed indices for LR table construction.
//!
//! Plain `usize`s get mixed up easily once a state index and a production
//! index are both floating around the same function; these newtypes make
//! the compiler catch the swap.

macro_rules! index_type {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);
    };
}

index_type!(
    /// Index of a state in the canonical LR(1) collection, assigned in
    /// order of first discovery.
    StateIndex
);

index_type!(
    /// Index of a production in `Grammar::productions`. Index 0 is always
    /// the augmented start production `$start -> S`.
    ProdIndex
);
