// Licensed under the Apache-2.0 license

use clap::PossibleValue;

use caravel_hw_model_test_fw::Fault;

/// Firmware misbehaviour selectable from the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FaultArg {
    None,
    Mismatch,
    NoGclk,
    Hang,
    NoUserIf,
}

impl FaultArg {
    pub fn fault(self) -> Option<Fault> {
        match self {
            Self::None => None,
            Self::Mismatch => Some(Fault::Mismatch),
            Self::NoGclk => Some(Fault::NoGclk),
            Self::Hang => Some(Fault::HangAfterRead),
            Self::NoUserIf => Some(Fault::NoUserInterface),
        }
    }
}

impl clap::ValueEnum for FaultArg {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::None,
            Self::Mismatch,
            Self::NoGclk,
            Self::Hang,
            Self::NoUserIf,
        ]
    }

    fn to_possible_value<'a>(&self) -> Option<PossibleValue<'a>> {
        Some(match self {
            Self::None => PossibleValue::new("none").help("run the firmware unmodified"),
            Self::Mismatch => {
                PossibleValue::new("mismatch").help("compare against a corrupted ciphertext")
            }
            Self::NoGclk => {
                PossibleValue::new("no-gclk").help("never enable the AES peripheral clock")
            }
            Self::Hang => PossibleValue::new("hang").help("stall after reading the ciphertext"),
            Self::NoUserIf => {
                PossibleValue::new("no-user-if").help("skip the user interface enable")
            }
        })
    }
}
