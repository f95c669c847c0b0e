//! Prints the hardware descriptor of the current device and of every device index given on the
//! command line.
//!
//! On a machine without the HIP runtime installed, every query reports `hipErrorNoDevice`.

use std::env;

use hip_hardware::{CorrectionPolicy, DeviceSelector, HipRuntime};

fn main() {
    let runtime = HipRuntime::new().with_correction_policy(CorrectionPolicy::BestEffort);

    let mut selectors = vec![DeviceSelector::Current];
    selectors.extend(
        env::args()
            .skip(1)
            .filter_map(|arg| arg.parse().ok())
            .map(DeviceSelector::Index),
    );

    for selector in selectors {
        match runtime.descriptor(selector) {
            Ok(descriptor) => {
                println!("{selector:?}: {descriptor}");
                println!("    target processor: {}", descriptor.target().processor());

                for feature in descriptor.target().features() {
                    println!(
                        "    target feature {}: {:?}",
                        feature.name(),
                        feature.setting()
                    );
                }
            }
            Err(e) => println!("{selector:?}: {e}"),
        }
    }
}
