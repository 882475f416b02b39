//! Question text templates. Every generator renders through here so the two
//! supported languages stay in lockstep.

use crate::db::types::Language;

pub(crate) fn addition(lang: Language, a: i64, b: i64) -> String {
    match lang {
        Language::English => format!("What is {a} + {b}?"),
        Language::French => format!("Combien font {a} + {b} ?"),
    }
}

pub(crate) fn subtraction(lang: Language, a: i64, b: i64) -> String {
    match lang {
        Language::English => format!("What is {a} - {b}?"),
        Language::French => format!("Combien font {a} - {b} ?"),
    }
}

pub(crate) fn multiplication(lang: Language, a: i64, b: i64) -> String {
    match lang {
        Language::English => format!("What is {a} × {b}?"),
        Language::French => format!("Combien font {a} × {b} ?"),
    }
}

pub(crate) fn division(lang: Language, a: i64, b: i64) -> String {
    match lang {
        Language::English => format!("What is {a} ÷ {b}?"),
        Language::French => format!("Combien font {a} ÷ {b} ?"),
    }
}

pub(crate) fn fraction_addition(lang: Language, a: i64, b: i64, c: i64, d: i64) -> String {
    match lang {
        Language::English => format!("What is {a}/{b} + {c}/{d}?"),
        Language::French => format!("Combien font {a}/{b} + {c}/{d} ?"),
    }
}

pub(crate) fn fraction_subtraction(lang: Language, a: i64, b: i64, c: i64, d: i64) -> String {
    match lang {
        Language::English => format!("What is {a}/{b} - {c}/{d}?"),
        Language::French => format!("Combien font {a}/{b} - {c}/{d} ?"),
    }
}

pub(crate) fn fraction_multiplication(lang: Language, a: i64, b: i64, c: i64, d: i64) -> String {
    match lang {
        Language::English => format!("What is {a}/{b} × {c}/{d}?"),
        Language::French => format!("Combien font {a}/{b} × {c}/{d} ?"),
    }
}

pub(crate) fn fraction_division(lang: Language, a: i64, b: i64, c: i64, d: i64) -> String {
    match lang {
        Language::English => format!("What is {a}/{b} ÷ {c}/{d}?"),
        Language::French => format!("Combien font {a}/{b} ÷ {c}/{d} ?"),
    }
}

pub(crate) fn linear_equation(lang: Language, a: i64, b: i64, c: i64) -> String {
    match lang {
        Language::English => format!("Solve for x: {a}x + {b} = {c}"),
        Language::French => format!("Résolvez pour x : {a}x + {b} = {c}"),
    }
}

pub(crate) fn quadratic_equation(lang: Language, a: i64, b: i64, c: i64) -> String {
    match lang {
        Language::English => {
            format!("Solve for x: {a}x² + {b}x + {c} = 0 (find one solution)")
        }
        Language::French => {
            format!("Résolvez pour x : {a}x² + {b}x + {c} = 0 (trouvez une solution)")
        }
    }
}

pub(crate) fn system_of_equations(
    lang: Language,
    a: i64,
    b: i64,
    c: i64,
    d: i64,
    e: i64,
    f: i64,
) -> String {
    match lang {
        Language::English => format!(
            "Solve the system: {a}x + {b}y = {c} and {d}x + {e}y = {f}. What is x?"
        ),
        Language::French => format!(
            "Résolvez le système : {a}x + {b}y = {c} et {d}x + {e}y = {f}. Quelle est la valeur de x ?"
        ),
    }
}

pub(crate) fn rectangle_area(lang: Language, length: i64, width: i64) -> String {
    match lang {
        Language::English => {
            format!("What is the area of a rectangle with length {length} and width {width}?")
        }
        Language::French => format!(
            "Quelle est l'aire d'un rectangle de longueur {length} et de largeur {width} ?"
        ),
    }
}

pub(crate) fn triangle_area(lang: Language, base: i64, height: i64) -> String {
    match lang {
        Language::English => {
            format!("What is the area of a triangle with base {base} and height {height}?")
        }
        Language::French => {
            format!("Quelle est l'aire d'un triangle de base {base} et de hauteur {height} ?")
        }
    }
}

pub(crate) fn circle_area(lang: Language, radius: i64) -> String {
    match lang {
        Language::English => {
            format!("What is the area of a circle with radius {radius}? (Use π ≈ 3.14)")
        }
        Language::French => {
            format!("Quelle est l'aire d'un cercle de rayon {radius} ? (Utilisez π ≈ 3,14)")
        }
    }
}

pub(crate) fn rectangle_perimeter(lang: Language, length: i64, width: i64) -> String {
    match lang {
        Language::English => {
            format!("What is the perimeter of a rectangle with length {length} and width {width}?")
        }
        Language::French => format!(
            "Quel est le périmètre d'un rectangle de longueur {length} et de largeur {width} ?"
        ),
    }
}

pub(crate) fn prism_volume(lang: Language, length: i64, width: i64, height: i64) -> String {
    match lang {
        Language::English => format!(
            "What is the volume of a rectangular prism with length {length}, width {width}, and height {height}?"
        ),
        Language::French => format!(
            "Quel est le volume d'un pavé droit de longueur {length}, de largeur {width} et de hauteur {height} ?"
        ),
    }
}

pub(crate) fn triangle_angle(lang: Language, first: i64, second: i64) -> String {
    match lang {
        Language::English => {
            format!("A triangle has angles of {first}° and {second}°. What is the third angle?")
        }
        Language::French => {
            format!("Un triangle a des angles de {first}° et {second}°. Quel est le troisième angle ?")
        }
    }
}
