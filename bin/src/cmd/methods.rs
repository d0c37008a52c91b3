//! Methods command implementation.

use tally::CombinationMethod;

/// Print every combination method with its code and description.
pub(crate) fn list_methods() {
    println!("{:<6} {:<22} Description", "Code", "Method");
    println!("{}", "-".repeat(80));

    for method in CombinationMethod::ALL {
        println!(
            "{:<6} {:<22} {}",
            method.code(),
            method.name(),
            method.description()
        );
    }
}
