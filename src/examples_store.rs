use std::collections::BTreeMap;

/// Display metadata for the built-in examples.
pub struct ExampleInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub difficulty: &'static str,
}

/// Example snippets offered by the picker, keyed by short name. Normally
/// fetched from the server at startup; falls back to a built-in set when the
/// server cannot be reached.
pub struct ExampleStore {
    examples: BTreeMap<String, String>,
    from_server: bool,
}

impl ExampleStore {
    pub fn empty() -> ExampleStore {
        ExampleStore {
            examples: BTreeMap::new(),
            from_server: false,
        }
    }

    pub fn from_server(examples: BTreeMap<String, String>) -> ExampleStore {
        ExampleStore {
            examples,
            from_server: true,
        }
    }

    pub fn local_fallback() -> ExampleStore {
        ExampleStore {
            examples: builtin_examples(),
            from_server: false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.examples.get(key).map(String::as_str)
    }

    /// Keys in sorted order, the order the picker lists them in.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.examples.keys().map(String::as_str)
    }

    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.keys().nth(index)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn is_from_server(&self) -> bool {
        self.from_server
    }

    /// Metadata for the well-known example names. Server-provided examples
    /// outside this set have none.
    pub fn info(&self, key: &str) -> Option<ExampleInfo> {
        let info = match key {
            "basic" => ExampleInfo {
                title: "Función Básica",
                description: "Ejemplo de función con manejo de errores y recursión",
                difficulty: "Principiante",
            },
            "loop" => ExampleInfo {
                title: "Bucles y Lógica",
                description: "Análisis de datos usando bucles, condicionales y estructuras",
                difficulty: "Intermedio",
            },
            "class" => ExampleInfo {
                title: "Programación OOP",
                description: "Sistema completo con clases, métodos y gestión de estado",
                difficulty: "Avanzado",
            },
            _ => return None,
        };
        Some(info)
    }
}

fn builtin_examples() -> BTreeMap<String, String> {
    let mut examples = BTreeMap::new();
    examples.insert(
        "basic".to_string(),
        r#"def calcular_factorial(n):
    """
    Calcula el factorial de un número entero positivo
    """
    if n < 0:
        raise ValueError("El número debe ser positivo")
    elif n <= 1:
        return 1
    else:
        return n * calcular_factorial(n - 1)

# Ejemplo de uso
try:
    numero = 5
    resultado = calcular_factorial(numero)
    print(f"El factorial de {numero} es {resultado}")
except ValueError as e:
    print(f"Error: {e}")"#
            .to_string(),
    );
    examples.insert(
        "loop".to_string(),
        r#"# Análisis de datos con bucles y condicionales
import random

def analizar_ventas():
    """Analiza las ventas mensuales y calcula estadísticas"""
    meses = ["Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio"]
    ventas = [random.randint(1000, 5000) for _ in range(len(meses))]

    total_ventas = sum(ventas)
    promedio = total_ventas / len(meses)
    max_ventas = max(ventas)
    min_ventas = min(ventas)

    print("📊 REPORTE DE VENTAS")
    print("-" * 30)

    for i, (mes, venta) in enumerate(zip(meses, ventas)):
        indicador = "📈" if venta > promedio else "📉"
        print(f"{mes}: ${venta:,} {indicador}")

    print("-" * 30)
    print(f"Total: ${total_ventas:,}")
    print(f"Promedio: ${promedio:,.2f}")
    print(f"Máximo: ${max_ventas:,}")
    print(f"Mínimo: ${min_ventas:,}")

    return {
        'total': total_ventas,
        'promedio': promedio,
        'maximo': max_ventas,
        'minimo': min_ventas
    }

# Ejecutar análisis
resultado = analizar_ventas()"#
            .to_string(),
    );
    examples.insert(
        "class".to_string(),
        r#"class GestorInventario:
    """Sistema de gestión de inventario para una tienda"""

    def __init__(self):
        self.productos = {}
        self.historial = []

    def agregar_producto(self, nombre, precio, stock=0):
        """Agrega un producto al inventario"""
        if nombre in self.productos:
            print(f"⚠️ El producto {nombre} ya existe. Actualizando...")

        self.productos[nombre] = {
            "precio": precio,
            "stock": stock,
            "fecha_agregado": "2024-01-01"
        }

        self.historial.append(f"Agregado: {nombre}")
        print(f"✅ Producto {nombre} agregado correctamente")

    def vender_producto(self, nombre, cantidad=1):
        """Vende una cantidad específica de un producto"""
        if nombre not in self.productos:
            print(f"❌ Error: Producto {nombre} no encontrado")
            return False

        if self.productos[nombre]["stock"] < cantidad:
            print(f"❌ Stock insuficiente para {nombre}")
            return False

        self.productos[nombre]["stock"] -= cantidad
        self.historial.append(f"Vendido: {cantidad}x {nombre}")
        print(f"💰 Vendido: {cantidad}x {nombre}")
        return True

    def mostrar_inventario(self):
        """Muestra todos los productos con su información"""
        if not self.productos:
            print("📦 Inventario vacío")
            return

        print("📋 INVENTARIO ACTUAL")
        print("=" * 50)

        total_valor = 0
        for nombre, datos in self.productos.items():
            valor_stock = datos['precio'] * datos['stock']
            total_valor += valor_stock

            # Indicador de stock
            if datos['stock'] == 0:
                indicador = "🔴"
            elif datos['stock'] < 5:
                indicador = "🟡"
            else:
                indicador = "🟢"

            print(f"{indicador} {nombre}:")
            print(f"   Precio: ${datos['precio']:,.2f}")
            print(f"   Stock: {datos['stock']} unidades")
            print(f"   Valor total: ${valor_stock:,.2f}")
            print("-" * 30)

        print(f"💎 VALOR TOTAL DEL INVENTARIO: ${total_valor:,.2f}")

    def mostrar_historial(self):
        """Muestra el historial de operaciones"""
        print("📈 HISTORIAL DE OPERACIONES:")
        for i, operacion in enumerate(self.historial[-10:], 1):
            print(f"  {i}. {operacion}")

# Demostración del sistema
print("🏪 Iniciando sistema de inventario...")
inventario = GestorInventario()

inventario.agregar_producto("Laptop Gaming", 1200, 15)
inventario.agregar_producto("Mouse Inalámbrico", 25, 50)
inventario.agregar_producto("Teclado Mecánico", 80, 3)

inventario.vender_producto("Laptop Gaming", 2)
inventario.vender_producto("Mouse Inalámbrico", 10)

print("\n")
inventario.mostrar_inventario()
print("\n")
inventario.mostrar_historial()"#
            .to_string(),
    );
    examples
}
