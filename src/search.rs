// src/search.rs

use crate::db::Contact;

/// Фильтрует список по подстроке без учёта регистра. Сравнение через
/// `str::to_lowercase`, чтобы «иванов» находил «Иванов»: SQLite LIKE
/// не умеет регистр вне ASCII, поэтому фильтруем на стороне приложения.
pub fn filter(contacts: Vec<Contact>, term: &str) -> Vec<Contact> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return contacts;
    }
    contacts
        .into_iter()
        .filter(|c| matches(c, &needle))
        .collect()
}

/// Запись подходит, если подстрока встречается хотя бы в одном из полей:
/// имя, телефон, email, адрес или telegram.
fn matches(contact: &Contact, needle: &str) -> bool {
    [
        contact.name.as_str(),
        contact.phone.as_str(),
        contact.email.as_str(),
        contact.address.as_str(),
        contact.telegram.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, phone: &str, email: &str) -> Contact {
        Contact {
            id: 0,
            name: name.to_string(),
            phone: phone.to_string(),
            organization: "КрасЮнит".to_string(),
            position: "Инженер".to_string(),
            email: email.to_string(),
            address: String::new(),
            notes: String::new(),
            telegram: String::new(),
        }
    }

    #[test]
    fn empty_term_returns_everything() {
        let all = vec![contact("Иванов", "+7 (999) 111-22-33", "")];
        assert_eq!(filter(all.clone(), "").len(), 1);
        assert_eq!(filter(all, "   ").len(), 1);
    }

    #[test]
    fn cyrillic_case_folding() {
        let all = vec![
            contact("Иванов Иван", "+7 (999) 111-22-33", ""),
            contact("Петров Пётр", "+7 (999) 444-55-66", ""),
        ];
        let found = filter(all, "ИВАНОВ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Иванов Иван");
    }

    #[test]
    fn matches_any_field() {
        let all = vec![
            contact("Иванов", "+7 (999) 111-22-33", "ivanov@krasunit.ru"),
            contact("Петров", "+7 (902) 444-55-66", ""),
        ];
        assert_eq!(filter(all.clone(), "902").len(), 1);
        assert_eq!(filter(all.clone(), "krasunit.ru").len(), 1);
        assert_eq!(filter(all, "нет такого").len(), 0);
    }

    #[test]
    fn notes_are_not_searched() {
        // Поиск идёт по имени/телефону/почте/адресу/telegram,
        // примечания в него не входят
        let mut c = contact("Иванов", "123", "");
        c.notes = "секретная пометка".to_string();
        assert!(filter(vec![c], "секретная").is_empty());
    }
}
