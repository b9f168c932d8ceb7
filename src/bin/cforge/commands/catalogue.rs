use std::io::{self, Write};

use anyhow::Result;

use conformer_forge::DescriptorCalculator;

use crate::cli::{CatalogueKind, DescriptorsArgs};

/// Prints one descriptor name per line, tab-separated from its kind.
pub fn run_catalogue(args: DescriptorsArgs) -> Result<()> {
    let calculator = DescriptorCalculator::new();
    let mut stdout = io::stdout().lock();

    if args.kind != CatalogueKind::ThreeD {
        for name in calculator.names_2d() {
            writeln!(stdout, "2d\t{name}")?;
        }
    }
    if args.kind != CatalogueKind::TwoD {
        for name in calculator.names_3d() {
            writeln!(stdout, "3d\t{name}")?;
        }
    }

    Ok(())
}
