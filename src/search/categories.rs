/// 关键词 -> 分类ID 对照表，关键词为小写
const CATEGORY_TERMS: &[(&str, &str)] = &[
    ("pizza", "pizza"),
    ("pizzeria", "pizza"),
    ("sushi", "sushi"),
    ("ramen", "ramen"),
    ("noodle", "noodles"),
    ("burger", "burgers"),
    ("taco", "mexican"),
    ("burrito", "mexican"),
    ("mexican", "mexican"),
    ("italian", "italian"),
    ("pasta", "italian"),
    ("chinese", "chinese"),
    ("thai", "thai"),
    ("indian", "indpak"),
    ("curry", "indpak"),
    ("coffee", "coffee"),
    ("espresso", "coffee"),
    ("cafe", "cafes"),
    ("bakery", "bakeries"),
    ("bread", "bakeries"),
    ("steak", "steak"),
    ("seafood", "seafood"),
    ("vegan", "vegan"),
    ("brunch", "breakfast_brunch"),
    ("breakfast", "breakfast_brunch"),
    ("hotel", "hotels"),
    ("gym", "gyms"),
    ("fitness", "gyms"),
    ("dentist", "dentists"),
    ("dental", "dentists"),
    ("salon", "hair"),
    ("barber", "barbers"),
    ("plumber", "plumbing"),
    ("mechanic", "autorepair"),
    ("auto repair", "autorepair"),
    ("bar", "bars"),
    ("pub", "pubs"),
];

/// 从查询中匹配分类ID，不区分大小写的子串匹配，按对照表顺序去重
pub fn categories_for_query(query: &str) -> Vec<&'static str> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut categories: Vec<&'static str> = Vec::new();
    for &(term, category) in CATEGORY_TERMS {
        if query.contains(term) && !categories.contains(&category) {
            categories.push(category);
        }
    }
    categories
}
