//! Name pools for synthetic teachers and students.

use rand::Rng;

const GIVEN_NAMES: &[&str] = &[
    "Олена", "Тарас", "Ірина", "Андрій", "Марія", "Богдан", "Оксана", "Дмитро",
    "Наталія", "Василь", "Софія", "Остап", "Галина", "Юрій", "Леся", "Максим",
    "Катерина", "Роман", "Ярина", "Степан", "Дарина", "Олег", "Христина", "Назар",
];

// Surnames that do not change with gender
const SURNAMES: &[&str] = &[
    "Шевченко", "Коваленко", "Бондаренко", "Ткаченко", "Кравчук", "Мельник",
    "Бойко", "Поліщук", "Савчук", "Лисенко", "Марченко", "Гнатюк", "Остапчук",
    "Мороз", "Левченко", "Романюк", "Карпенко", "Павлюк", "Руденко", "Кущ",
];

/// Draw a "Given Surname" full name
pub fn full_name<R: Rng>(rng: &mut R) -> String {
    let given = GIVEN_NAMES[rng.random_range(0..GIVEN_NAMES.len())];
    let surname = SURNAMES[rng.random_range(0..SURNAMES.len())];
    format!("{} {}", given, surname)
}
