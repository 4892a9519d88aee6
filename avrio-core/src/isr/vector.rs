//! ATmega328P interrupt vectors

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interrupt vectors of the ATmega328P (vector 0, reset, excluded)
///
/// Discriminants are the hardware vector numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum Vector {
    /// External interrupt request 0 (PD2)
    Int0 = 1,
    /// External interrupt request 1 (PD3)
    Int1 = 2,
    /// Pin change on port B
    PcInt0 = 3,
    /// Pin change on port C
    PcInt1 = 4,
    /// Pin change on port D
    PcInt2 = 5,
    /// Watchdog time-out
    Wdt = 6,
    Timer2CompA = 7,
    Timer2CompB = 8,
    Timer2Ovf = 9,
    Timer1Capt = 10,
    Timer1CompA = 11,
    Timer1CompB = 12,
    Timer1Ovf = 13,
    Timer0CompA = 14,
    Timer0CompB = 15,
    Timer0Ovf = 16,
    SpiStc = 17,
    UsartRx = 18,
    UsartUdre = 19,
    UsartTx = 20,
    Adc = 21,
    EeReady = 22,
    AnalogComp = 23,
    Twi = 24,
    SpmReady = 25,
}

impl Vector {
    /// Number of vectors
    pub const COUNT: usize = 25;

    /// All vectors, by vector number
    pub const ALL: [Vector; Self::COUNT] = [
        Vector::Int0,
        Vector::Int1,
        Vector::PcInt0,
        Vector::PcInt1,
        Vector::PcInt2,
        Vector::Wdt,
        Vector::Timer2CompA,
        Vector::Timer2CompB,
        Vector::Timer2Ovf,
        Vector::Timer1Capt,
        Vector::Timer1CompA,
        Vector::Timer1CompB,
        Vector::Timer1Ovf,
        Vector::Timer0CompA,
        Vector::Timer0CompB,
        Vector::Timer0Ovf,
        Vector::SpiStc,
        Vector::UsartRx,
        Vector::UsartUdre,
        Vector::UsartTx,
        Vector::Adc,
        Vector::EeReady,
        Vector::AnalogComp,
        Vector::Twi,
        Vector::SpmReady,
    ];

    /// Hardware vector number (1..=25)
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Slot in a table of [`COUNT`](Self::COUNT) entries
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Look up a vector by hardware number
    pub const fn from_number(number: u8) -> Option<Self> {
        if number >= 1 && number as usize <= Self::COUNT {
            Some(Self::ALL[number as usize - 1])
        } else {
            None
        }
    }
}
