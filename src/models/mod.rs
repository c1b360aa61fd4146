mod investment;
mod allocation;
pub mod seed;

pub use investment::{Investment, InvestmentKind, InvestmentType};
pub use allocation::{Allocation, AllocationSlice, total_value};
