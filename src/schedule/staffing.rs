use super::types::SalesProjection;

/// Projected sales one employee is expected to cover
pub const SALES_PER_EMPLOYEE: f64 = 100.0;

/// Headcount needed for a projection: ceil(projection / 100)
pub fn required_staff(projection: SalesProjection) -> u32 {
    // projection is finite and non-negative, so the cast cannot wrap
    (projection.value() / SALES_PER_EMPLOYEE).ceil() as u32
}

/// True when fewer employees are assigned than the projection requires
pub fn is_understaffed(shift_count: usize, projection: SalesProjection) -> bool {
    (shift_count as u64) < u64::from(required_staff(projection))
}
