//! Parameter Sets

use crate::geometry::*;
use crate::pbrt::*;
use std::collections::HashMap;
use std::fmt;

mod paramset_item;

// Re-export
pub use paramset_item::*;

/// A hashmap of parameter sets stored by name.
pub type ParamSetMap<T> = HashMap<String, ParamSetItem<T>>;

/// Stores parameter set items of different types in hashmaps.
#[derive(Clone)]
pub struct ParamSet {
    pub bools: ParamSetMap<bool>,
    pub ints: ParamSetMap<Int>,
    pub floats: ParamSetMap<Float>,
    pub point2fs: ParamSetMap<Point2f>,
    pub point3fs: ParamSetMap<Point3f>,
    pub vector3fs: ParamSetMap<Vector3f>,
    pub strings: ParamSetMap<String>,
}

/// Define a macro that can be used to generate a function for adding/replacing
/// parameter set item.
macro_rules! paramset_add {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&mut self, name: &str, values: &[$t]) {
            let n = String::from(name);
            self.$paramset.insert(n, ParamSetItem::new(values.to_vec()));
        }
    };
}

/// Define a macro that can be used to generate a function for removing
/// parameter set item.
macro_rules! paramset_erase {
    ($func: ident, $paramset: ident) => {
        pub fn $func(&mut self, name: &str) -> bool {
            self.$paramset.remove(name).is_some()
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a single item.
macro_rules! paramset_find_one {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str, default: $t) -> $t {
            match self.$paramset.get(name) {
                Some(param) => match param.lookup() {
                    [value] => value.clone(),
                    _ => default,
                },
                None => default,
            }
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a list.
macro_rules! paramset_find {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str) -> Vec<$t> {
            match self.$paramset.get(name) {
                Some(param) => param.lookup().to_vec(),
                None => vec![],
            }
        }
    };
}

/// Define a macro that can be used to print parameter set items.
macro_rules! display_param {
    ($params: expr, $param_type: literal, $formatter: expr) => {
        for (name, param) in $params.iter() {
            let n = param.values.len();
            write!($formatter, "\n\"{} {}\" [", $param_type, name)?;
            if n > 0 {
                write!($formatter, "\n    ")?;

                let mut nc = 0;
                for (i, v) in param.values.iter().enumerate() {
                    let s = if i < n - 1 {
                        format!("{} ", v)
                    } else {
                        format!("{}", v)
                    };

                    nc += s.len();
                    if nc > 80 {
                        write!($formatter, "{}\n    ", s)?;
                        nc = 0;
                    } else {
                        write!($formatter, "{}", s)?;
                    }
                }
                writeln!($formatter)?;
            }
            writeln!($formatter, "]")?;
        }
    };
}

/// Define a macro that collects names of parameter set items never read back.
macro_rules! unused_params {
    ($params: expr, $param_type: literal, $unused: expr) => {
        for (name, param) in $params.iter() {
            if !param.looked_up.get() {
                $unused.push(format!("\"{} {}\"", $param_type, name));
            }
        }
    };
}

impl ParamSet {
    /// Returns a new `ParamSet`.
    pub fn new() -> Self {
        Self {
            bools: HashMap::new(),
            ints: HashMap::new(),
            floats: HashMap::new(),
            point2fs: HashMap::new(),
            point3fs: HashMap::new(),
            vector3fs: HashMap::new(),
            strings: HashMap::new(),
        }
    }

    paramset_erase!(erase_int, ints);
    paramset_find_one!(find_one_int, Int, ints);
    paramset_find!(find_int, Int, ints);
    paramset_add!(add_int, Int, ints);

    paramset_erase!(erase_bool, bools);
    paramset_find_one!(find_one_bool, bool, bools);
    paramset_find!(find_bool, bool, bools);
    paramset_add!(add_bool, bool, bools);

    paramset_erase!(erase_float, floats);
    paramset_find_one!(find_one_float, Float, floats);
    paramset_find!(find_float, Float, floats);
    paramset_add!(add_float, Float, floats);

    paramset_erase!(erase_point2f, point2fs);
    paramset_find_one!(find_one_point2f, Point2f, point2fs);
    paramset_find!(find_point2f, Point2f, point2fs);
    paramset_add!(add_point2f, Point2f, point2fs);

    paramset_erase!(erase_point3f, point3fs);
    paramset_find_one!(find_one_point3f, Point3f, point3fs);
    paramset_find!(find_point3f, Point3f, point3fs);
    paramset_add!(add_point3f, Point3f, point3fs);

    paramset_erase!(erase_vector3f, vector3fs);
    paramset_find_one!(find_one_vector3f, Vector3f, vector3fs);
    paramset_find!(find_vector3f, Vector3f, vector3fs);
    paramset_add!(add_vector3f, Vector3f, vector3fs);

    paramset_erase!(erase_string, strings);
    paramset_find_one!(find_one_string, String, strings);
    paramset_find!(find_string, String, strings);
    paramset_add!(add_string, String, strings);

    /// Returns the names of parameters that were never read back, in the
    /// form `"type name"`, sorted.
    pub fn unused(&self) -> Vec<String> {
        let mut unused = vec![];
        unused_params!(self.bools, "bool", unused);
        unused_params!(self.ints, "integer", unused);
        unused_params!(self.floats, "float", unused);
        unused_params!(self.point2fs, "point2", unused);
        unused_params!(self.point3fs, "point3", unused);
        unused_params!(self.vector3fs, "vector3", unused);
        unused_params!(self.strings, "string", unused);
        unused.sort();
        unused
    }

    /// Logs a warning for each parameter that was never read back.
    pub fn report_unused(&self) {
        for name in self.unused() {
            warn!("Parameter {} not used", name);
        }
    }

    /// Clear all parameter set items.
    pub fn clear(&mut self) {
        self.bools.clear();
        self.ints.clear();
        self.floats.clear();
        self.point2fs.clear();
        self.point3fs.clear();
        self.vector3fs.clear();
        self.strings.clear();
    }
}

impl Default for ParamSet {
    /// Returns the "default value" for `ParamSet`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParamSet {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_param!(self.bools, "bool", f);
        display_param!(self.ints, "integer", f);
        display_param!(self.floats, "float", f);
        display_param!(self.point2fs, "point2", f);
        display_param!(self.point3fs, "point3", f);
        display_param!(self.vector3fs, "vector3", f);
        display_param!(self.strings, "string", f);
        Ok(())
    }
}
