#![macro_use]
#![allow(unused_macros)]

// Logging front-end. Firmware builds route to defmt, host builds to the log
// facade. With neither enabled the arguments are still borrowed so callers
// don't trip unused-variable lints.

macro_rules! log_impl {
	($level:ident, $s:literal $(, $x:expr)* $(,)?) => {{
		#[cfg(feature = "defmt")]
		::defmt::$level!($s $(, $x)*);
		#[cfg(all(feature = "log", not(feature = "defmt")))]
		::log::$level!($s $(, $x)*);
		#[cfg(not(any(feature = "log", feature = "defmt")))]
		let _ = ($(&$x,)*);
	}};
}

macro_rules! debug {
	($s:literal $(, $x:expr)* $(,)?) => { log_impl!(debug, $s $(, $x)*) };
}

macro_rules! info {
	($s:literal $(, $x:expr)* $(,)?) => { log_impl!(info, $s $(, $x)*) };
}

macro_rules! warn {
	($s:literal $(, $x:expr)* $(,)?) => { log_impl!(warn, $s $(, $x)*) };
}

macro_rules! error {
	($s:literal $(, $x:expr)* $(,)?) => { log_impl!(error, $s $(, $x)*) };
}
