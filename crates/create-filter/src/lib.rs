pub mod date_fin_effectif;
pub mod error;
pub mod exclusion;
pub mod perimeter;
pub mod period;
pub mod reader;

pub use date_fin_effectif::detect_date_fin_effectif;
pub use error::FilterError;
pub use exclusion::SirenExclusion;
pub use perimeter::{
    create_filter, guess_last_n_missing, is_inside_perimeter, output_perimeter, PerimeterParams,
    PerimeterStats,
};
pub use period::{effectif_col_name_to_period, urssaf_to_period, Periode};
pub use reader::HeadcountSource;

pub type Result<T> = std::result::Result<T, FilterError>;
