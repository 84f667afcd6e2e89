// src/export.rs
//
// Экспорт полного набора записей: CSV, JSON и XLSX. Всё сводится к чтению всей
// таблицы в память и сериализация в буфер; состояние не трогаем.

use rust_xlsxwriter::Workbook;

use crate::db::Contact;
use crate::error::AppError;

/// Заголовок CSV в том виде, в каком его ждут в бухгалтерии.
/// Тот же порядок колонок используется в XLSX.
pub const EXPORT_HEADER: [&str; 8] = [
    "ID",
    "Имя",
    "Телефон",
    "Организация",
    "Должность",
    "Email",
    "Адрес",
    "Примечания",
];

fn export_row(c: &Contact) -> [String; 8] {
    [
        c.id.to_string(),
        c.name.clone(),
        c.phone.clone(),
        c.organization.clone(),
        c.position.clone(),
        c.email.clone(),
        c.address.clone(),
        c.notes.clone(),
    ]
}

/// CSV: строка заголовка, затем по строке на запись, UTF-8.
pub fn to_csv(contacts: &[Contact]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;
    for contact in contacts {
        writer.write_record(export_row(contact))?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    Ok(data)
}

/// JSON: массив записей целиком (включая telegram), с отступами.
pub fn to_json(contacts: &[Contact]) -> Result<Vec<u8>, AppError> {
    Ok(serde_json::to_vec_pretty(contacts)?)
}

/// XLSX: одна книга, один лист, те же колонки, что и в CSV.
pub fn to_xlsx(contacts: &[Contact]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Контакты")?;

    for (col, title) in EXPORT_HEADER.iter().enumerate() {
        worksheet.write_string(0, col as u16, *title)?;
    }
    for (row, contact) in contacts.iter().enumerate() {
        for (col, value) in export_row(contact).iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts() -> Vec<Contact> {
        vec![
            Contact {
                id: 1,
                name: "Иванов Иван".to_string(),
                phone: "+7 (999) 123-45-67".to_string(),
                organization: "КрасЮнит".to_string(),
                position: "Инженер".to_string(),
                email: "ivanov@krasunit.ru".to_string(),
                address: "Красноярск".to_string(),
                notes: "пометка, с запятой".to_string(),
                telegram: "@ivanov".to_string(),
            },
            Contact {
                id: 2,
                name: "Петров".to_string(),
                phone: "+7 (902) 000-11-22".to_string(),
                organization: "СибТех".to_string(),
                position: "Директор".to_string(),
                email: String::new(),
                address: String::new(),
                notes: String::new(),
                telegram: String::new(),
            },
        ]
    }

    #[test]
    fn csv_header_and_rows() {
        let bytes = to_csv(&contacts()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,Имя,Телефон,Организация,Должность,Email,Адрес,Примечания"
        );
        // Две записи, две строки данных; значение с запятой взято в кавычки
        let first = lines.next().unwrap();
        assert!(first.starts_with("1,Иванов Иван,"));
        assert!(first.contains("\"пометка, с запятой\""));
        assert!(lines.next().unwrap().starts_with("2,Петров,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn csv_roundtrips_cyrillic() {
        let source = contacts();
        let bytes = to_csv(&source).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), source.len());
        assert_eq!(&rows[0][1], "Иванов Иван");
        assert_eq!(&rows[0][7], "пометка, с запятой");
    }

    #[test]
    fn json_is_full_record_array() {
        let bytes = to_json(&contacts()).unwrap();
        let parsed: Vec<Contact> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "Иванов Иван");
        assert_eq!(parsed[0].telegram, "@ivanov");
    }

    #[test]
    fn xlsx_is_a_zip_workbook() {
        let bytes = to_xlsx(&contacts()).unwrap();
        // XLSX по сути zip-архив, начинается с сигнатуры PK
        assert_eq!(&bytes[..2], b"PK");
        assert!(bytes.len() > 500);
    }

    #[test]
    fn empty_table_exports_header_only() {
        let bytes = to_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
