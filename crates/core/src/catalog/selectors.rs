//! DOM anchors of the catalog pages.
//!
//! Everything the pipeline knows about the remote markup lives here. The
//! menu walk relies on stable DOM ordering on the remote site; keeping the
//! ordinals in one place makes the selection strategy swappable without
//! touching the query engine.

/// Login form.
pub const USERNAME_INPUT: &str = "input[name='username']";
pub const PASSWORD_INPUT: &str = "input[name='password']";
pub const LOGIN_MODE_SELECT: &str = "select[name='loginType']";
pub const LOGIN_SUBMIT: &str = "input[type='button']";

/// Menu walk to the part search view.
pub const BRAND_MENU_TEXT: &str = "Marca";
pub const BRAND_MENU_ENTRIES: &str = ".LangHref";
/// Zero-based position of the brand entry in the dropdown.
pub const BRAND_MENU_ENTRY_INDEX: usize = 3;
pub const SEARCH_MENU_ITEM: &str = ".MenuDropLists li:nth-child(4) a";

/// Part search form and its results view.
pub const SEARCH_INPUT: &str = "input[id='fPNumber']";
pub const DETAIL_LABEL_CELLS: &str = "td.part_details_label";
pub const DETAIL_VALUE_CELLS: &str = "td.part_details_value";

/// Label text marking the weight row of the results view.
pub const WEIGHT_LABEL_MARKER: &str = "Peso em gramas:";
