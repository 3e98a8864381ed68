/// A movie the input step can suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: &'static str,
    pub year: &'static str,
}

const fn entry(title: &'static str, year: &'static str) -> CatalogEntry {
    CatalogEntry { title, year }
}

/// Static suggestion catalog, one landmark film per year-ish.
pub const CATALOG: &[CatalogEntry] = &[
    entry("The Empire Strikes Back", "1980"),
    entry("Raiders of the Lost Ark", "1981"),
    entry("E.T. the Extra-Terrestrial", "1982"),
    entry("Scarface", "1983"),
    entry("The Terminator", "1984"),
    entry("Back to the Future", "1985"),
    entry("Aliens", "1986"),
    entry("The Princess Bride", "1987"),
    entry("Die Hard", "1988"),
    entry("Batman", "1989"),
    entry("Goodfellas", "1990"),
    entry("The Silence of the Lambs", "1991"),
    entry("Reservoir Dogs", "1992"),
    entry("Jurassic Park", "1993"),
    entry("Pulp Fiction", "1994"),
    entry("Braveheart", "1995"),
    entry("Fargo", "1996"),
    entry("Titanic", "1997"),
    entry("The Truman Show", "1998"),
    entry("The Matrix", "1999"),
    entry("Gladiator", "2000"),
    entry("The Lord of the Rings: The Fellowship of the Ring", "2001"),
    entry("Spider-Man", "2002"),
    entry("Finding Nemo", "2003"),
    entry("The Incredibles", "2004"),
    entry("Batman Begins", "2005"),
    entry("The Departed", "2006"),
    entry("No Country for Old Men", "2007"),
    entry("The Dark Knight", "2008"),
    entry("Avatar", "2009"),
    entry("Inception", "2010"),
    entry("The Social Network", "2010"),
    entry("The Avengers", "2012"),
    entry("Frozen", "2013"),
    entry("Interstellar", "2014"),
    entry("Mad Max: Fury Road", "2015"),
    entry("La La Land", "2016"),
    entry("Get Out", "2017"),
    entry("Avengers: Infinity War", "2018"),
    entry("Parasite", "2019"),
    entry("Tenet", "2020"),
    entry("Dune", "2021"),
    entry("Everything Everywhere All at Once", "2022"),
    entry("Top Gun: Maverick", "2022"),
    entry("Oppenheimer", "2023"),
    entry("Barbie", "2023"),
    entry("Dune: Part Two", "2024"),
];

/// Titles offered on the input step before the user types anything.
pub const FEATURED: &[CatalogEntry] = &[
    entry("Inception", "2010"),
    entry("The Dark Knight", "2008"),
    entry("Interstellar", "2014"),
    entry("The Matrix", "1999"),
];

/// Entries whose title or year contains `query` (case-insensitive), in catalog order.
/// An empty query matches nothing.
pub fn filter(query: &str) -> Vec<&'static CatalogEntry> {
    filter_in(CATALOG, query)
}

/// Same as [`filter`] over an arbitrary catalog.
pub fn filter_in<'a>(catalog: &'a [CatalogEntry], query: &str) -> Vec<&'a CatalogEntry> {
    if query.is_empty() {
        return Vec::new();
    }
    let q = query.to_lowercase();
    catalog
        .iter()
        .filter(|e| e.title.to_lowercase().contains(&q) || e.year.to_lowercase().contains(&q))
        .collect()
}

/// Exact (case-insensitive) title lookup.
pub fn find_title(title: &str) -> Option<&'static CatalogEntry> {
    let t = title.trim();
    CATALOG.iter().find(|e| e.title.eq_ignore_ascii_case(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_empty() {
        assert!(filter("").is_empty());
    }

    #[test]
    fn test_title_substring_case_insensitive() {
        let titles: Vec<_> = filter("DARK").iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["The Dark Knight"]);
    }

    #[test]
    fn test_year_match() {
        let titles: Vec<_> = filter("2010").iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Inception", "The Social Network"]);
    }

    #[test]
    fn test_results_keep_catalog_order() {
        let results = filter("batman");
        let titles: Vec<_> = results.iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Batman", "Batman Begins"]);

        // Subsequence of the catalog
        let mut last = 0;
        for r in filter("the") {
            let pos = CATALOG.iter().position(|e| e == r).unwrap();
            assert!(pos >= last);
            last = pos;
        }
    }

    #[test]
    fn test_every_result_matches() {
        for q in ["a", "19", "ma", "Dune"] {
            let ql = q.to_lowercase();
            for e in filter(q) {
                assert!(e.title.to_lowercase().contains(&ql) || e.year.contains(&ql));
            }
        }
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        assert!(filter("zzzz not a movie").is_empty());
    }

    #[test]
    fn test_find_title() {
        assert_eq!(find_title("inception").map(|e| e.year), Some("2010"));
        assert!(find_title("Incep").is_none());
    }

    #[test]
    fn test_featured_are_in_catalog() {
        for f in FEATURED {
            assert_eq!(find_title(f.title), Some(f));
        }
    }
}
