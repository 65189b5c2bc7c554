//! Test utilities and shared fixtures for engine tests

use chrono::{DateTime, Utc};

use crate::schema::{AssignError, CellValue, FieldSpec, FromCell, Record};

mod registry_tests;

/// Roster record mirroring a typical staff import sheet
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub age: i8,
    pub address: String,
    pub birthday: DateTime<Utc>,
    pub height: f64,
    pub is_staff: bool,
    pub speed: Option<i16>,
    pub hobby: String,
    pub joined_nanos: i64,
}

impl Record for Member {
    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::skipped("id"),
            FieldSpec::new("name", "name", "String").required(),
            FieldSpec::new("age", "age", "i8").required(),
            FieldSpec::new("address", "address", "String"),
            FieldSpec::new("birthday", "birthday", "DateTime").required(),
            FieldSpec::new("height", "height", "f64").required(),
            FieldSpec::new("is_staff", "isStaff", "bool").required(),
            FieldSpec::new("speed", "speed", "i16"),
            FieldSpec::new("hobby", "爱好", "String"),
            FieldSpec::new("joined_nanos", "joined", "i64").with_parser("unix_nano"),
        ];
        FIELDS
    }

    fn assign(&mut self, index: usize, value: CellValue) -> Result<(), AssignError> {
        let got = value.type_name();
        let mismatch = move || AssignError { index, got };
        match index {
            0 => self.id = FromCell::from_cell(value).ok_or_else(mismatch)?,
            1 => self.name = FromCell::from_cell(value).ok_or_else(mismatch)?,
            2 => self.age = FromCell::from_cell(value).ok_or_else(mismatch)?,
            3 => self.address = FromCell::from_cell(value).ok_or_else(mismatch)?,
            4 => self.birthday = FromCell::from_cell(value).ok_or_else(mismatch)?,
            5 => self.height = FromCell::from_cell(value).ok_or_else(mismatch)?,
            6 => self.is_staff = FromCell::from_cell(value).ok_or_else(mismatch)?,
            7 => self.speed = FromCell::from_cell(value).ok_or_else(mismatch)?,
            8 => self.hobby = FromCell::from_cell(value).ok_or_else(mismatch)?,
            9 => self.joined_nanos = FromCell::from_cell(value).ok_or_else(mismatch)?,
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    fn get(&self, index: usize) -> Option<CellValue> {
        match index {
            0 => Some(CellValue::I64(self.id)),
            1 => Some(CellValue::Str(self.name.clone())),
            2 => Some(CellValue::I8(self.age)),
            3 => Some(CellValue::Str(self.address.clone())),
            4 => Some(CellValue::DateTime(self.birthday)),
            5 => Some(CellValue::F64(self.height)),
            6 => Some(CellValue::Bool(self.is_staff)),
            7 => Some(CellValue::I16(self.speed.unwrap_or(0))),
            8 => Some(CellValue::Str(self.hobby.clone())),
            9 => Some(CellValue::I64(self.joined_nanos)),
            _ => None,
        }
    }
}

/// Minimal two-column record used by the policy and pipeline tests
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i8,
}

impl Record for Person {
    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::new("name", "name", "String").required(),
            FieldSpec::new("age", "age", "i8").required(),
        ];
        FIELDS
    }

    fn assign(&mut self, index: usize, value: CellValue) -> Result<(), AssignError> {
        let got = value.type_name();
        let mismatch = move || AssignError { index, got };
        match index {
            0 => self.name = FromCell::from_cell(value).ok_or_else(mismatch)?,
            1 => self.age = FromCell::from_cell(value).ok_or_else(mismatch)?,
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    fn get(&self, index: usize) -> Option<CellValue> {
        match index {
            0 => Some(CellValue::Str(self.name.clone())),
            1 => Some(CellValue::I8(self.age)),
            _ => None,
        }
    }
}

/// Sensor reading record exercising defaults and explicit column indices
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reading {
    pub sensor: String,
    pub level: i32,
    pub value: f64,
}

impl Record for Reading {
    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::new("sensor", "sensor", "String").required(),
            FieldSpec::new("level", "level", "i32").with_default("7"),
            FieldSpec::new("value", "value", "f64").at_column(2),
        ];
        FIELDS
    }

    fn assign(&mut self, index: usize, value: CellValue) -> Result<(), AssignError> {
        let got = value.type_name();
        let mismatch = move || AssignError { index, got };
        match index {
            0 => self.sensor = FromCell::from_cell(value).ok_or_else(mismatch)?,
            1 => self.level = FromCell::from_cell(value).ok_or_else(mismatch)?,
            2 => self.value = FromCell::from_cell(value).ok_or_else(mismatch)?,
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    fn get(&self, index: usize) -> Option<CellValue> {
        match index {
            0 => Some(CellValue::Str(self.sensor.clone())),
            1 => Some(CellValue::I32(self.level)),
            2 => Some(CellValue::F64(self.value)),
            _ => None,
        }
    }
}

/// Build an owned row matrix from string literals
pub fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}
