//! Interrupt vectors and their handlers

pub mod table;
pub mod vector;

pub use table::{BindError, FunctionHandler, InterruptHandler, MethodHandler, VectorTable};
pub use vector::Vector;

/// Check that no vector appears twice
///
/// Used by [`bind_vectors!`](crate::bind_vectors) in a const assertion.
pub const fn distinct_vectors(vectors: &[Vector]) -> bool {
    let mut i = 0;
    while i < vectors.len() {
        let mut j = i + 1;
        while j < vectors.len() {
            if vectors[i] as u8 == vectors[j] as u8 {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Bind handlers to vectors, refusing duplicates at compile time
///
/// Expands to a [`VectorTable::bind_all`] call and evaluates to its
/// `Result`; a vector already bound earlier yields
/// [`BindError::AlreadyBound`].
///
/// ```
/// use avrio_core::bind_vectors;
/// use avrio_core::isr::{FunctionHandler, VectorTable};
///
/// fn on_watchdog() {}
/// fn on_buttons() {}
///
/// let watchdog = FunctionHandler(on_watchdog);
/// let buttons = FunctionHandler(on_buttons);
/// let mut table = VectorTable::new();
/// bind_vectors!(table, { Wdt => &watchdog, PcInt2 => &buttons }).unwrap();
/// assert!(table.invoke(avrio_core::Vector::Wdt));
/// ```
///
/// Listing a vector twice does not compile:
///
/// ```compile_fail
/// use avrio_core::bind_vectors;
/// use avrio_core::isr::{FunctionHandler, VectorTable};
///
/// fn noop() {}
///
/// let handler = FunctionHandler(noop);
/// let mut table = VectorTable::new();
/// let _ = bind_vectors!(table, { Wdt => &handler, Wdt => &handler });
/// ```
#[macro_export]
macro_rules! bind_vectors {
    ($table:expr, { $($vector:ident => $handler:expr),+ $(,)? }) => {{
        const _: () = ::core::assert!(
            $crate::isr::distinct_vectors(&[$($crate::isr::Vector::$vector),+]),
            "interrupt vector bound twice"
        );
        $table.bind_all(&[
            $(($crate::isr::Vector::$vector, $handler as &dyn $crate::isr::InterruptHandler)),+
        ])
    }};
}
