#![cfg(test)]

pub struct TestCoin;

impl crate::address::AddressPrefixes for TestCoin {
    const STANDARD: u64 = 0x2b_c817; // CAL
}
