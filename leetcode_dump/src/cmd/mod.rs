pub mod dump;

use clap::ValueEnum;
use leetcode_dump_libs::Region;
use std::fmt;

#[derive(Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// LeetCode International (leetcode.com)
    Intl,
    /// LeetCode China (leetcode.cn)
    Cn,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Domain::Intl => write!(f, "intl"),
            Domain::Cn => write!(f, "cn"),
        }
    }
}

impl From<Domain> for Region {
    fn from(domain: Domain) -> Region {
        match domain {
            Domain::Intl => Region::International,
            Domain::Cn => Region::China,
        }
    }
}
