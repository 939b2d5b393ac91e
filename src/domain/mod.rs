/*!
 * Domain model for the students domain.
 *
 * A `Student` owns an ordered collection of `Phone`s. Neither type knows
 * anything about the store; the `database` module maps them to rows.
 */

pub mod phone;
pub mod student;

pub use phone::Phone;
pub use student::Student;
