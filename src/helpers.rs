/// Splits `(a,b,c),(d,e,f)` into `["a,b,c", "d,e,f"]`.
pub fn parse_tuple_string(data: String) -> Vec<String> {
    let Some(str) = data.trim().strip_prefix('(') else {
        return Vec::new();
    };
    let splited = str.split(",(");
    let mut items: Vec<String> = Vec::new();

    for c in splited {
        if let Some(index) = c.find(')') {
            let tuple_data = &c[0..index];
            items.push(tuple_data.to_owned());
        }
    }

    items
}

/// Splits a comma separated list, dropping blank items.
pub fn parse_list(data: &str) -> Vec<String> {
    data.split(',')
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}
