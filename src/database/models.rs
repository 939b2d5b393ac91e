/*!
 * Row records for the students store.
 *
 * These structures map directly to result rows and carry raw column
 * values across the store boundary. Conversion into domain objects
 * happens here so the repository only issues queries.
 */

use chrono::NaiveDate;
use rusqlite::Row;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::domain::{Phone, Student};
use crate::errors::StoreError;

/// Format of dates crossing the store boundary
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a date the way the store expects it
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Row of the `students` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    /// Primary key
    pub id: i64,
    /// Student name
    pub name: String,
    /// Birth date as stored (`YYYY-MM-DD`)
    pub birth_date: String,
}

impl StudentRow {
    /// Read a row selected with `SELECT * FROM students`
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            birth_date: row.get("birth_date")?,
        })
    }

    /// Convert into a persisted student with no phones loaded
    pub fn into_student(self) -> Result<Student, StoreError> {
        let birth_date = parse_birth_date(self.id, &self.birth_date)?;
        Ok(Student::persisted(self.id, self.name, birth_date))
    }
}

/// Row of the `phones` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRow {
    /// Primary key
    pub id: i64,
    /// Area code
    pub area_code: String,
    /// Local number
    pub number: String,
}

impl PhoneRow {
    /// Read a row selected with `SELECT id, area_code, number FROM phones`
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            area_code: row.get("area_code")?,
            number: row.get("number")?,
        })
    }

    pub fn into_phone(self) -> Phone {
        Phone::new(self.id, self.area_code, self.number)
    }
}

/// Denormalized row produced by joining `students` with `phones`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentPhoneRow {
    /// Student columns
    pub student: StudentRow,
    /// Phone columns, `phones.id` aliased as `phone_id`
    pub phone: PhoneRow,
}

impl StudentPhoneRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            student: StudentRow {
                id: row.get("id")?,
                name: row.get("name")?,
                birth_date: row.get("birth_date")?,
            },
            phone: PhoneRow {
                id: row.get("phone_id")?,
                area_code: row.get("area_code")?,
                number: row.get("number")?,
            },
        })
    }
}

/// Rebuild the student/phone graph from joined rows
///
/// The first row seen for a student id creates the student; every row,
/// the first one included, contributes exactly one phone. Only the first
/// row's student columns are read.
pub fn hydrate_students_with_phones<I>(rows: I) -> Result<BTreeMap<i64, Student>, StoreError>
where
    I: IntoIterator<Item = StudentPhoneRow>,
{
    let mut students = BTreeMap::new();

    for StudentPhoneRow { student, phone } in rows {
        let entry = match students.entry(student.id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(student.into_student()?),
        };
        entry.add_phone(phone.into_phone());
    }

    Ok(students)
}

fn parse_birth_date(student_id: i64, value: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| StoreError::InvalidDate {
        student_id,
        value: value.to_string(),
    })
}
