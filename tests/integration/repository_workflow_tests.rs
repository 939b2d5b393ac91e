/*!
 * Integration tests for the student repository against SQLite
 */

use anyhow::Result;
use studentdb::{Student, StudentRepository};

use crate::common::{self, date};

/// The original insert script's record must come back from a birth date query
#[test]
fn test_insertThenBirthDateQuery_shouldFindVinicius() -> Result<()> {
    let repo = common::create_test_repo();

    let saved = repo.save(Student::new("Vinicius Francischini", date(2000, 12, 12)))?;
    assert!(saved.id().is_some());

    let born = repo.students_birth_at(date(2000, 12, 12))?;
    assert!(born.iter().any(|s| {
        s.name() == "Vinicius Francischini" && s.birth_date() == date(2000, 12, 12)
    }));
    Ok(())
}

/// Birth date queries return exactly the matching subset for every stored date
#[test]
fn test_studentsBirthAt_forEveryStoredDate_shouldReturnExactSubset() -> Result<()> {
    let repo = common::create_test_repo();
    let dates = [date(2000, 1, 1), date(2000, 1, 2), date(1999, 12, 31)];
    let mut saved = Vec::new();
    for (i, birth_date) in dates.iter().cycle().take(7).enumerate() {
        saved.push(repo.save(Student::new(format!("Student {}", i), *birth_date))?);
    }

    for birth_date in dates {
        let mut expected: Vec<i64> = saved
            .iter()
            .filter(|s| s.birth_date() == birth_date)
            .filter_map(|s| s.id())
            .collect();
        let mut actual: Vec<i64> = repo
            .students_birth_at(birth_date)?
            .iter()
            .filter_map(|s| s.id())
            .collect();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected, "mismatch for {}", birth_date);
    }

    assert!(repo.students_birth_at(date(1980, 5, 5))?.is_empty());
    Ok(())
}

/// Full lifecycle: unpersisted -> persisted -> updated -> removed
#[test]
fn test_lifecycle_insertUpdateRemove_shouldFollowStateMachine() -> Result<()> {
    let repo = common::create_test_repo();

    let student = Student::new("Ana", date(2001, 3, 4));
    assert!(!student.is_persisted());

    let persisted = repo.save(student)?;
    let id = persisted.id().expect("insert assigns an id");

    let updated = repo.save(Student::persisted(id, "Ana Clara", date(2001, 3, 5)))?;
    assert_eq!(updated.id(), Some(id));

    let all = repo.all_students()?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name(), "Ana Clara");
    assert_eq!(all[0].birth_date(), date(2001, 3, 5));

    repo.remove(&updated)?;
    assert!(repo.all_students()?.is_empty());

    // The removed value is stale but intact
    assert_eq!(updated.id(), Some(id));
    assert_eq!(updated.name(), "Ana Clara");
    Ok(())
}

/// Removing an unknown id is indistinguishable from a real removal
#[test]
fn test_remove_withUnknownId_shouldMatchSuccessfulRemoval() -> Result<()> {
    let repo = common::create_test_repo();
    let ana = common::insert_student(&repo, "Ana", date(2000, 1, 1));

    let real = repo.remove(&ana);
    let again = repo.remove(&ana);
    let never_existed = repo.remove(&Student::persisted(12345, "Ghost", date(1990, 1, 1)));

    assert!(real.is_ok());
    assert!(again.is_ok());
    assert!(never_existed.is_ok());
    Ok(())
}

/// The join returns N phones for N phone rows and omits phoneless students
#[test]
fn test_studentsWithPhones_shouldMatchPhoneRowCounts() -> Result<()> {
    let repo = common::create_test_repo();
    let db = repo.connection();

    let ana = common::insert_student(&repo, "Ana", date(2000, 1, 1));
    let bruno = common::insert_student(&repo, "Bruno", date(2000, 2, 2));
    let carla = common::insert_student(&repo, "Carla", date(2000, 3, 3));

    common::insert_phone(db, ana.id().unwrap(), "11", "1111-0001");
    for n in 0..4 {
        common::insert_phone(db, bruno.id().unwrap(), "21", &format!("2222-000{}", n));
    }

    let students = repo.students_with_phones()?;

    assert_eq!(students.len(), 2);
    assert!(!students.contains_key(&carla.id().unwrap()));
    assert_eq!(students[&ana.id().unwrap()].phones().len(), 1);

    let loaded_bruno = &students[&bruno.id().unwrap()];
    assert_eq!(loaded_bruno.name(), "Bruno");
    assert_eq!(loaded_bruno.birth_date(), date(2000, 2, 2));
    assert_eq!(loaded_bruno.phones().len(), 4);
    assert!(loaded_bruno.phones().iter().all(|p| p.area_code() == "21"));

    // Listing stays phone-free; explicit loading sees the same rows
    let listed = repo.all_students()?;
    assert!(listed.iter().all(|s| s.phones().is_empty()));
    assert_eq!(repo.phones_of(&bruno)?.len(), 4);
    assert!(repo.phones_of(&carla)?.is_empty());
    Ok(())
}

/// Cloned repositories share one connection
#[test]
fn test_clonedRepository_shouldSeeSameStore() -> Result<()> {
    let repo = common::create_test_repo();
    let clone = repo.clone();

    clone.save(Student::new("Ana", date(2000, 1, 1)))?;

    assert_eq!(repo.all_students()?.len(), 1);
    Ok(())
}
