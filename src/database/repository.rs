/*!
 * Repository layer for student persistence.
 *
 * `StudentRepository` is the contract callers program against;
 * `SqliteStudentRepository` implements it with one parameterized statement
 * per use case. Listing methods never load phones. Phones are loaded
 * explicitly, either per student (`phones_of`) or in bulk through the
 * students/phones join (`students_with_phones`).
 */

use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::named_params;
use std::collections::BTreeMap;

use super::connection::DatabaseConnection;
use super::models::{
    format_date, hydrate_students_with_phones, PhoneRow, StudentPhoneRow, StudentRow,
};
use crate::domain::{Phone, Student};
use crate::errors::StoreError;

const SELECT_ALL_STUDENTS: &str = "SELECT * FROM students;";

const SELECT_STUDENTS_BY_BIRTH_DATE: &str =
    "SELECT * FROM students WHERE birth_date = :birth_date;";

const SELECT_PHONES_OF_STUDENT: &str =
    "SELECT id, area_code, number FROM phones WHERE student_id = :id;";

const INSERT_STUDENT: &str =
    "INSERT INTO students (name, birth_date) VALUES (:name, :birth_date);";

const UPDATE_STUDENT: &str =
    "UPDATE students SET name = :name, birth_date = :birth_date WHERE id = :id;";

const DELETE_STUDENT: &str = "DELETE FROM students WHERE id = :id;";

const SELECT_STUDENTS_WITH_PHONES: &str = "SELECT students.id, students.name, students.birth_date, \
     phones.id AS phone_id, phones.area_code, phones.number \
     FROM students JOIN phones ON students.id = phones.student_id;";

/// Persistence contract for students
pub trait StudentRepository {
    /// Every persisted student, each with an empty phone collection.
    /// Order is whatever the store returns.
    fn all_students(&self) -> Result<Vec<Student>, StoreError>;

    /// Students born exactly on `birth_date`, phones not loaded
    fn students_birth_at(&self, birth_date: NaiveDate) -> Result<Vec<Student>, StoreError>;

    /// Students that own at least one phone, keyed by id, phones loaded.
    ///
    /// Students without phones are absent: this is an inner join.
    fn students_with_phones(&self) -> Result<BTreeMap<i64, Student>, StoreError>;

    /// Phones owned by a persisted student
    fn phones_of(&self, student: &Student) -> Result<Vec<Phone>, StoreError>;

    /// Insert an unpersisted student or update a persisted one.
    ///
    /// Returns the student as stored: after an insert it carries the
    /// store-assigned id, after an update it is returned unchanged. An
    /// update that matches no row still succeeds.
    fn save(&self, student: Student) -> Result<Student, StoreError>;

    /// Delete the row matching the student's id.
    ///
    /// Succeeds whether or not a row matched. The value passed in is left
    /// as is; callers must not reuse it.
    fn remove(&self, student: &Student) -> Result<(), StoreError>;

    /// Return `student` with its phones appended
    fn with_phones(&self, mut student: Student) -> Result<Student, StoreError> {
        for phone in self.phones_of(&student)? {
            student.add_phone(phone);
        }
        Ok(student)
    }
}

/// `StudentRepository` backed by a SQLite connection
#[derive(Clone)]
pub struct SqliteStudentRepository {
    /// Database connection
    db: DatabaseConnection,
}

impl SqliteStudentRepository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> anyhow::Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// The underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn insert(&self, student: Student) -> Result<Student, StoreError> {
        let id = self.db.execute(|conn| {
            conn.execute(
                INSERT_STUDENT,
                named_params! {
                    ":name": student.name(),
                    ":birth_date": format_date(student.birth_date()),
                },
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        info!("Inserted student {} with id {}", student.name(), id);
        Ok(student.define_id(id)?)
    }

    fn update(&self, id: i64, student: Student) -> Result<Student, StoreError> {
        let affected = self.db.execute(|conn| {
            Ok(conn.execute(
                UPDATE_STUDENT,
                named_params! {
                    ":name": student.name(),
                    ":birth_date": format_date(student.birth_date()),
                    ":id": id,
                },
            )?)
        })?;

        debug!("Update of student {} matched {} row(s)", id, affected);
        Ok(student)
    }

    fn query_students<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<Student>, StoreError> {
        let rows = self.db.execute(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt
                .query_map(params, StudentRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        rows.into_iter().map(StudentRow::into_student).collect()
    }
}

impl StudentRepository for SqliteStudentRepository {
    fn all_students(&self) -> Result<Vec<Student>, StoreError> {
        let students = self.query_students(SELECT_ALL_STUDENTS, [])?;
        debug!("Loaded {} student(s)", students.len());
        Ok(students)
    }

    fn students_birth_at(&self, birth_date: NaiveDate) -> Result<Vec<Student>, StoreError> {
        let students = self.query_students(
            SELECT_STUDENTS_BY_BIRTH_DATE,
            named_params! { ":birth_date": format_date(birth_date) },
        )?;
        debug!("Found {} student(s) born at {}", students.len(), birth_date);
        Ok(students)
    }

    fn students_with_phones(&self) -> Result<BTreeMap<i64, Student>, StoreError> {
        let rows = self.db.execute(|conn| {
            let mut stmt = conn.prepare(SELECT_STUDENTS_WITH_PHONES)?;
            let rows = stmt
                .query_map([], StudentPhoneRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        debug!("Hydrating students from {} joined row(s)", rows.len());
        hydrate_students_with_phones(rows)
    }

    fn phones_of(&self, student: &Student) -> Result<Vec<Phone>, StoreError> {
        let id = student
            .id()
            .ok_or_else(|| StoreError::NotPersisted(student.name().to_string()))?;

        self.db.execute(|conn| {
            let mut stmt = conn.prepare(SELECT_PHONES_OF_STUDENT)?;
            let phones = stmt
                .query_map(named_params! { ":id": id }, PhoneRow::from_row)?
                .map(|row| row.map(PhoneRow::into_phone))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(phones)
        })
    }

    fn save(&self, student: Student) -> Result<Student, StoreError> {
        match student.id() {
            None => self.insert(student),
            Some(id) => self.update(id, student),
        }
    }

    fn remove(&self, student: &Student) -> Result<(), StoreError> {
        let id = student
            .id()
            .ok_or_else(|| StoreError::NotPersisted(student.name().to_string()))?;

        let affected = self.db.execute(|conn| {
            Ok(conn.execute(DELETE_STUDENT, named_params! { ":id": id })?)
        })?;

        debug!("Removal of student {} matched {} row(s)", id, affected);
        Ok(())
    }
}
