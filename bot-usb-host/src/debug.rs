// Debug printing goes to defmt on embedded targets that have it, to
// stdout on hosted targets, and nowhere otherwise.

#[cfg(all(target_os = "none", feature = "defmt"))]
pub use defmt::debug as println;

#[cfg(all(feature = "std", not(all(target_os = "none", feature = "defmt"))))]
extern crate std;

#[cfg(all(feature = "std", not(all(target_os = "none", feature = "defmt"))))]
pub use std::println;

#[cfg(all(
    not(feature = "std"),
    not(all(target_os = "none", feature = "defmt"))
))]
#[macro_export]
macro_rules! println {
    ($fmt:expr) => {};
    ($fmt:expr, $($arg:tt)*) => {};
}

#[cfg(all(
    not(feature = "std"),
    not(all(target_os = "none", feature = "defmt"))
))]
pub use println;
